use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "book_loans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub book_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
    pub borrowed_on: Date,
    pub due_on: Date,
    pub returned_on: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::library_book::Entity",
        from = "Column::BookId",
        to = "super::library_book::Column::Id",
        on_delete = "Cascade"
    )]
    LibraryBook,
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::library_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryBook.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
