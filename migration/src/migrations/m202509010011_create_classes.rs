use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202509010011_create_classes"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("classes"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("school_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("school_year_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("year_level_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("code")).string().not_null())
                    .col(ColumnDef::new(Alias::new("name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("name_ar")).string().not_null())
                    .col(ColumnDef::new(Alias::new("homeroom_teacher_id")).integer())
                    .col(ColumnDef::new(Alias::new("capacity")).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("classes"), Alias::new("school_id"))
                            .to(Alias::new("schools"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("classes"), Alias::new("school_year_id"))
                            .to(Alias::new("school_years"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("classes"), Alias::new("year_level_id"))
                            .to(Alias::new("year_levels"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("classes"), Alias::new("homeroom_teacher_id"))
                            .to(Alias::new("teachers"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_classes_year_code")
                    .table(Alias::new("classes"))
                    .col(Alias::new("school_year_id"))
                    .col(Alias::new("code"))
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("classes")).to_owned())
            .await
    }
}
