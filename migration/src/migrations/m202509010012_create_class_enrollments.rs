use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202509010012_create_class_enrollments"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("class_enrollments"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("class_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("student_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("school_year_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("enrolled_on")).date().not_null())
                    .primary_key(
                        Index::create()
                            .col(Alias::new("class_id"))
                            .col(Alias::new("student_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("class_enrollments"), Alias::new("class_id"))
                            .to(Alias::new("classes"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("class_enrollments"), Alias::new("student_id"))
                            .to(Alias::new("students"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("class_enrollments"), Alias::new("school_year_id"))
                            .to(Alias::new("school_years"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A student sits in one class per school year.
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_year_student")
                    .table(Alias::new("class_enrollments"))
                    .col(Alias::new("school_year_id"))
                    .col(Alias::new("student_id"))
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("class_enrollments")).to_owned())
            .await
    }
}
