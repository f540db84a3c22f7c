use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Term result of one student in one subject.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grade_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub term_id: i64,
    /// Percentage, 0.0 to 100.0.
    #[sea_orm(column_type = "Double")]
    pub score: f64,
    pub letter: String,
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
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id",
        on_delete = "Cascade"
    )]
    Subject,
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

/// Letter grade for a percentage score.
pub fn letter_for(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "A",
        s if s >= 80.0 => "B",
        s if s >= 70.0 => "C",
        s if s >= 60.0 => "D",
        _ => "F",
    }
}

#[cfg(test)]
mod tests {
    use super::letter_for;

    #[test]
    fn letter_boundaries() {
        assert_eq!(letter_for(100.0), "A");
        assert_eq!(letter_for(90.0), "A");
        assert_eq!(letter_for(89.9), "B");
        assert_eq!(letter_for(60.0), "D");
        assert_eq!(letter_for(12.5), "F");
    }
}
