//! Rebuilds references from what is already persisted for a tenant.
//!
//! Every query selects only the projected columns and filters on the
//! tenant's `school_id`; rows of other schools are never returned.

use crate::error::SeedError;
use crate::refs::{
    BookRef, ClassRef, EnrollmentRef, EntityKind, GuardianRef, RefSet, SchoolRef, SchoolYearRef,
    StudentRef, SubjectRef, TeacherRef, TermRef, UserRef, YearLevelRef,
};
use crate::seed::Requirement;
use crate::tenant::TenantContext;
use chrono::NaiveDate;
use db::models::user::Role;
use db::models::{
    class, class_enrollment, guardian, library_book, school, school_year, student, subject,
    teacher, term, user, year_level,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};

/// Roles created by the `users` phase; profile accounts belong to `people`.
pub const STAFF_ROLES: [Role; 5] = [
    Role::Admin,
    Role::Principal,
    Role::Accountant,
    Role::Librarian,
    Role::Registrar,
];

pub struct Resolver<'a> {
    db: &'a DatabaseConnection,
    school: SchoolRef,
}

impl<'a> Resolver<'a> {
    /// A resolver for a school already known to exist.
    pub fn new(db: &'a DatabaseConnection, school: SchoolRef) -> Self {
        Self { db, school }
    }

    /// Looks up the tenant by its domain.
    pub async fn find_school(
        db: &DatabaseConnection,
        domain: &str,
    ) -> Result<Option<SchoolRef>, DbErr> {
        let row = school::Entity::find()
            .select_only()
            .columns([school::Column::Id, school::Column::Domain])
            .filter(school::Column::Domain.eq(domain))
            .into_tuple::<(i64, String)>()
            .one(db)
            .await?;
        Ok(row.map(|(id, domain)| SchoolRef { id, domain }))
    }

    /// A resolver scoped to an existing tenant, or `MissingTenant`.
    pub async fn for_tenant(
        db: &'a DatabaseConnection,
        tenant: &TenantContext,
    ) -> Result<Self, SeedError> {
        match Self::find_school(db, &tenant.domain).await? {
            Some(school) => Ok(Self { db, school }),
            None => Err(SeedError::MissingTenant {
                domain: tenant.domain.clone(),
            }),
        }
    }

    pub fn school(&self) -> &SchoolRef {
        &self.school
    }

    /// Loads one kind into `refs` and returns how many rows were found.
    pub async fn load(&self, kind: EntityKind, refs: &mut RefSet) -> Result<usize, SeedError> {
        match kind {
            EntityKind::School => refs.set_school(self.school.clone()),
            EntityKind::User => refs.set_users(self.users().await?),
            EntityKind::SchoolYear => refs.set_school_years(self.school_years().await?),
            EntityKind::Term => refs.set_terms(self.terms().await?),
            EntityKind::YearLevel => refs.set_year_levels(self.year_levels().await?),
            EntityKind::Subject => refs.set_subjects(self.subjects().await?),
            EntityKind::Teacher => refs.set_teachers(self.teachers().await?),
            EntityKind::Student => refs.set_students(self.students().await?),
            EntityKind::Guardian => refs.set_guardians(self.guardians().await?),
            EntityKind::Class => refs.set_classes(self.classes().await?),
            EntityKind::Enrollment => refs.set_enrollments(self.enrollments().await?),
            EntityKind::Book => refs.set_books(self.books().await?),
        }
        Ok(refs.len(kind))
    }

    /// Loads a requirement of `phase`. An empty result is fine for an
    /// optional requirement and a precondition error for a required one.
    pub async fn require(
        &self,
        phase: &str,
        requirement: Requirement,
        provider: &str,
        refs: &mut RefSet,
    ) -> Result<(), SeedError> {
        let kind = requirement.kind();
        let found = self.load(kind, refs).await?;
        log::debug!("Resolved {found} {kind} reference(s) for `{phase}`");
        if found == 0 && requirement.is_required() {
            return Err(SeedError::MissingPrerequisite {
                phase: phase.to_owned(),
                kind,
                provider: provider.to_owned(),
            });
        }
        Ok(())
    }

    pub async fn users(&self) -> Result<Vec<UserRef>, DbErr> {
        let rows = user::Entity::find()
            .select_only()
            .columns([user::Column::Id, user::Column::Email, user::Column::Role])
            .filter(user::Column::SchoolId.eq(self.school.id))
            .filter(user::Column::Role.is_in(STAFF_ROLES))
            .order_by_asc(user::Column::Id)
            .into_tuple::<(i64, String, Role)>()
            .all(self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, email, role)| UserRef { id, email, role })
            .collect())
    }

    pub async fn school_years(&self) -> Result<Vec<SchoolYearRef>, DbErr> {
        let rows = school_year::Entity::find()
            .select_only()
            .columns([
                school_year::Column::Id,
                school_year::Column::Name,
                school_year::Column::StartsOn,
                school_year::Column::IsCurrent,
            ])
            .filter(school_year::Column::SchoolId.eq(self.school.id))
            .order_by_asc(school_year::Column::StartsOn)
            .into_tuple::<(i64, String, NaiveDate, bool)>()
            .all(self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name, starts_on, is_current)| SchoolYearRef {
                id,
                name,
                starts_on,
                is_current,
            })
            .collect())
    }

    /// Terms of the current school year only.
    pub async fn terms(&self) -> Result<Vec<TermRef>, DbErr> {
        let rows = term::Entity::find()
            .select_only()
            .columns([
                term::Column::Id,
                term::Column::SchoolYearId,
                term::Column::Sequence,
                term::Column::StartsOn,
            ])
            .join(JoinType::InnerJoin, term::Relation::SchoolYear.def())
            .filter(term::Column::SchoolId.eq(self.school.id))
            .filter(school_year::Column::IsCurrent.eq(true))
            .order_by_asc(term::Column::Sequence)
            .into_tuple::<(i64, i64, i32, NaiveDate)>()
            .all(self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, school_year_id, sequence, starts_on)| TermRef {
                id,
                school_year_id,
                sequence,
                starts_on,
            })
            .collect())
    }

    pub async fn year_levels(&self) -> Result<Vec<YearLevelRef>, DbErr> {
        let rows = year_level::Entity::find()
            .select_only()
            .columns([
                year_level::Column::Id,
                year_level::Column::Code,
                year_level::Column::LevelOrder,
            ])
            .filter(year_level::Column::SchoolId.eq(self.school.id))
            .order_by_asc(year_level::Column::LevelOrder)
            .into_tuple::<(i64, String, i32)>()
            .all(self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, code, level_order)| YearLevelRef {
                id,
                code,
                level_order,
            })
            .collect())
    }

    pub async fn subjects(&self) -> Result<Vec<SubjectRef>, DbErr> {
        let rows = subject::Entity::find()
            .select_only()
            .columns([subject::Column::Id, subject::Column::Code])
            .filter(subject::Column::SchoolId.eq(self.school.id))
            .order_by_asc(subject::Column::Id)
            .into_tuple::<(i64, String)>()
            .all(self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, code)| SubjectRef { id, code })
            .collect())
    }

    pub async fn teachers(&self) -> Result<Vec<TeacherRef>, DbErr> {
        let rows = teacher::Entity::find()
            .select_only()
            .columns([
                teacher::Column::Id,
                teacher::Column::UserId,
                teacher::Column::EmployeeCode,
                teacher::Column::SubjectId,
            ])
            .filter(teacher::Column::SchoolId.eq(self.school.id))
            .order_by_asc(teacher::Column::EmployeeCode)
            .into_tuple::<(i64, i64, String, Option<i64>)>()
            .all(self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, user_id, employee_code, subject_id)| TeacherRef {
                id,
                user_id,
                employee_code,
                subject_id,
            })
            .collect())
    }

    pub async fn students(&self) -> Result<Vec<StudentRef>, DbErr> {
        let rows = student::Entity::find()
            .select_only()
            .columns([
                student::Column::Id,
                student::Column::UserId,
                student::Column::StudentNumber,
                student::Column::YearLevelId,
            ])
            .filter(student::Column::SchoolId.eq(self.school.id))
            .order_by_asc(student::Column::StudentNumber)
            .into_tuple::<(i64, i64, String, i64)>()
            .all(self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, user_id, student_number, year_level_id)| StudentRef {
                id,
                user_id,
                student_number,
                year_level_id,
            })
            .collect())
    }

    pub async fn guardians(&self) -> Result<Vec<GuardianRef>, DbErr> {
        let rows = guardian::Entity::find()
            .select_only()
            .columns([guardian::Column::Id, guardian::Column::UserId])
            .filter(guardian::Column::SchoolId.eq(self.school.id))
            .order_by_asc(guardian::Column::Id)
            .into_tuple::<(i64, i64)>()
            .all(self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, user_id)| GuardianRef { id, user_id })
            .collect())
    }

    /// Classes of the current school year only.
    pub async fn classes(&self) -> Result<Vec<ClassRef>, DbErr> {
        let rows = class::Entity::find()
            .select_only()
            .columns([
                class::Column::Id,
                class::Column::Code,
                class::Column::SchoolYearId,
                class::Column::YearLevelId,
            ])
            .join(JoinType::InnerJoin, class::Relation::SchoolYear.def())
            .filter(class::Column::SchoolId.eq(self.school.id))
            .filter(school_year::Column::IsCurrent.eq(true))
            .order_by_asc(class::Column::Code)
            .into_tuple::<(i64, String, i64, i64)>()
            .all(self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, code, school_year_id, year_level_id)| ClassRef {
                id,
                code,
                school_year_id,
                year_level_id,
            })
            .collect())
    }

    /// Enrollments into classes of the current school year.
    pub async fn enrollments(&self) -> Result<Vec<EnrollmentRef>, DbErr> {
        let rows = class_enrollment::Entity::find()
            .select_only()
            .columns([
                class_enrollment::Column::ClassId,
                class_enrollment::Column::StudentId,
            ])
            .join(JoinType::InnerJoin, class_enrollment::Relation::Class.def())
            .join(JoinType::InnerJoin, class::Relation::SchoolYear.def())
            .filter(class::Column::SchoolId.eq(self.school.id))
            .filter(school_year::Column::IsCurrent.eq(true))
            .order_by_asc(class_enrollment::Column::ClassId)
            .order_by_asc(class_enrollment::Column::StudentId)
            .into_tuple::<(i64, i64)>()
            .all(self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(class_id, student_id)| EnrollmentRef {
                class_id,
                student_id,
            })
            .collect())
    }

    pub async fn books(&self) -> Result<Vec<BookRef>, DbErr> {
        let rows = library_book::Entity::find()
            .select_only()
            .columns([library_book::Column::Id, library_book::Column::Isbn])
            .filter(library_book::Column::SchoolId.eq(self.school.id))
            .order_by_asc(library_book::Column::Isbn)
            .into_tuple::<(i64, String)>()
            .all(self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, isbn)| BookRef { id, isbn })
            .collect())
    }
}
