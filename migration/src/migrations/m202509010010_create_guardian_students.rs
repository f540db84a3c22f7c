use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202509010010_create_guardian_students"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("guardian_students"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("guardian_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("student_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("relationship")).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(Alias::new("guardian_id"))
                            .col(Alias::new("student_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("guardian_students"), Alias::new("guardian_id"))
                            .to(Alias::new("guardians"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("guardian_students"), Alias::new("student_id"))
                            .to(Alias::new("students"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("guardian_students")).to_owned())
            .await
    }
}
