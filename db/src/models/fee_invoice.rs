use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Tuition invoice for one student and one term. Amounts are in halalas.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub term_id: i64,
    pub invoice_number: String,
    pub amount_cents: i64,
    pub paid_cents: i64,
    pub status: InvoiceStatus,
    pub due_on: Date,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "snake_case")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl InvoiceStatus {
    /// Status implied by how much of `amount` has been paid.
    pub fn from_amounts(amount: i64, paid: i64) -> Self {
        if paid <= 0 {
            InvoiceStatus::Unpaid
        } else if paid < amount {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Paid
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::term::Entity",
        from = "Column::TermId",
        to = "super::term::Column::Id",
        on_delete = "Cascade"
    )]
    Term,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::InvoiceStatus;

    #[test]
    fn status_follows_paid_amount() {
        assert_eq!(InvoiceStatus::from_amounts(1000, 0), InvoiceStatus::Unpaid);
        assert_eq!(InvoiceStatus::from_amounts(1000, 400), InvoiceStatus::Partial);
        assert_eq!(InvoiceStatus::from_amounts(1000, 1000), InvoiceStatus::Paid);
    }
}
