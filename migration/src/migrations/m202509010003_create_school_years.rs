use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202509010003_create_school_years"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("school_years"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("school_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("starts_on")).date().not_null())
                    .col(ColumnDef::new(Alias::new("ends_on")).date().not_null())
                    .col(ColumnDef::new(Alias::new("is_current")).boolean().not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("school_years"), Alias::new("school_id"))
                            .to(Alias::new("schools"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_school_years_school_name")
                    .table(Alias::new("school_years"))
                    .col(Alias::new("school_id"))
                    .col(Alias::new("name"))
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("school_years")).to_owned())
            .await
    }
}
