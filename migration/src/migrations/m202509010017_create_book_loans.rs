use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202509010017_create_book_loans"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("book_loans"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("book_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("student_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("borrowed_on")).date().not_null())
                    .col(ColumnDef::new(Alias::new("due_on")).date().not_null())
                    .col(ColumnDef::new(Alias::new("returned_on")).date())
                    .primary_key(
                        Index::create()
                            .col(Alias::new("book_id"))
                            .col(Alias::new("student_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("book_loans"), Alias::new("book_id"))
                            .to(Alias::new("library_books"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("book_loans"), Alias::new("student_id"))
                            .to(Alias::new("students"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("book_loans")).to_owned())
            .await
    }
}
