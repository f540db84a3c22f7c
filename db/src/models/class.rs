use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A homeroom section of one year level in one school year (e.g. `G07-B`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub school_year_id: i64,
    pub year_level_id: i64,
    /// Unique within the school year.
    pub code: String,
    pub name: String,
    pub name_ar: String,
    pub homeroom_teacher_id: Option<i64>,
    pub capacity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::school_year::Entity",
        from = "Column::SchoolYearId",
        to = "super::school_year::Column::Id",
        on_delete = "Cascade"
    )]
    SchoolYear,
    #[sea_orm(
        belongs_to = "super::year_level::Entity",
        from = "Column::YearLevelId",
        to = "super::year_level::Column::Id"
    )]
    YearLevel,
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::HomeroomTeacherId",
        to = "super::teacher::Column::Id",
        on_delete = "SetNull"
    )]
    HomeroomTeacher,
}

impl Related<super::school_year::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SchoolYear.def()
    }
}

impl Related<super::year_level::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::YearLevel.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        super::class_enrollment::Relation::Student.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::class_enrollment::Relation::Class.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
