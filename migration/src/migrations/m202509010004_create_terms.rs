use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202509010004_create_terms"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("terms"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("school_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("school_year_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("sequence")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("name_ar")).string().not_null())
                    .col(ColumnDef::new(Alias::new("starts_on")).date().not_null())
                    .col(ColumnDef::new(Alias::new("ends_on")).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("terms"), Alias::new("school_id"))
                            .to(Alias::new("schools"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("terms"), Alias::new("school_year_id"))
                            .to(Alias::new("school_years"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_terms_year_sequence")
                    .table(Alias::new("terms"))
                    .col(Alias::new("school_year_id"))
                    .col(Alias::new("sequence"))
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("terms")).to_owned())
            .await
    }
}
