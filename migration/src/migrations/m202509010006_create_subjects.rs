use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202509010006_create_subjects"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("subjects"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("school_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("code")).string().not_null())
                    .col(ColumnDef::new(Alias::new("name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("name_ar")).string().not_null())
                    .col(ColumnDef::new(Alias::new("weekly_periods")).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("subjects"), Alias::new("school_id"))
                            .to(Alias::new("schools"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subjects_school_code")
                    .table(Alias::new("subjects"))
                    .col(Alias::new("school_id"))
                    .col(Alias::new("code"))
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("subjects")).to_owned())
            .await
    }
}
