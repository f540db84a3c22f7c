use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202509010015_create_fee_invoices"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("fee_invoices"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("school_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("student_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("term_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("invoice_number")).string().not_null())
                    .col(ColumnDef::new(Alias::new("amount_cents")).big_integer().not_null())
                    .col(ColumnDef::new(Alias::new("paid_cents")).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Alias::new("status")).string().not_null())
                    .col(ColumnDef::new(Alias::new("due_on")).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("fee_invoices"), Alias::new("school_id"))
                            .to(Alias::new("schools"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("fee_invoices"), Alias::new("student_id"))
                            .to(Alias::new("students"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("fee_invoices"), Alias::new("term_id"))
                            .to(Alias::new("terms"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_school_number")
                    .table(Alias::new("fee_invoices"))
                    .col(Alias::new("school_id"))
                    .col(Alias::new("invoice_number"))
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("fee_invoices")).to_owned())
            .await
    }
}
