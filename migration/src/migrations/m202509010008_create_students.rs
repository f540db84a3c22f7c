use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202509010008_create_students"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("students"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("school_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("user_id")).integer().not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("student_number")).string().not_null())
                    .col(ColumnDef::new(Alias::new("year_level_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("gender")).string().not_null())
                    .col(ColumnDef::new(Alias::new("born_on")).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("students"), Alias::new("school_id"))
                            .to(Alias::new("schools"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("students"), Alias::new("user_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("students"), Alias::new("year_level_id"))
                            .to(Alias::new("year_levels"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_school_number")
                    .table(Alias::new("students"))
                    .col(Alias::new("school_id"))
                    .col(Alias::new("student_number"))
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("students")).to_owned())
            .await
    }
}
