pub mod academic;
pub mod announcements;
pub mod attendance;
pub mod classes;
pub mod finance;
pub mod grades;
pub mod library;
pub mod people;
pub mod school;
pub mod users;

use crate::error::SeedError;
use crate::orchestrator::Registry;
use crate::persist::{Outcome, find_or_create};
use crate::refs::{EntityKind, RefSet};
use crate::seed::Phase;
use chrono::{Datelike, NaiveDate, Utc};
use db::models::user::{self, Role};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, DbErr, Set};

/// The built-in pipeline, in registration order.
pub fn phases() -> Vec<Box<dyn Phase>> {
    vec![
        Box::new(school::SchoolSeeder),
        Box::new(users::UsersSeeder),
        Box::new(academic::AcademicSeeder),
        Box::new(people::PeopleSeeder),
        Box::new(classes::ClassesSeeder),
        Box::new(attendance::AttendanceSeeder),
        Box::new(grades::GradesSeeder),
        Box::new(finance::FinanceSeeder),
        Box::new(library::LibrarySeeder),
        Box::new(announcements::AnnouncementsSeeder),
    ]
}

pub fn registry() -> Result<Registry, SeedError> {
    Registry::new(phases())
}

pub(crate) fn school_id(phase: &str, refs: &RefSet) -> Result<i64, SeedError> {
    refs.school()
        .map(|s| s.id)
        .ok_or_else(|| SeedError::missing(phase, EntityKind::School))
}

/// Calendar year of the September the school year containing `today` began in.
pub(crate) fn school_year_start(today: NaiveDate) -> i32 {
    if today.month() >= 9 {
        today.year()
    } else {
        today.year() - 1
    }
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, SeedError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(SeedError::InvalidDate { year, month, day })
}

/// A login account owned by one of the generated people or staff.
pub(crate) struct Account {
    pub email: String,
    pub full_name: String,
    pub full_name_ar: String,
    pub role: Role,
    pub phone: Option<String>,
}

/// Finds the account by `(school_id, email)` or creates it with `password_hash`.
pub(crate) async fn ensure_account(
    db: &DatabaseConnection,
    school_id: i64,
    password_hash: &str,
    account: Account,
) -> Result<(user::Model, Outcome), DbErr> {
    let key = Condition::all()
        .add(user::Column::SchoolId.eq(school_id))
        .add(user::Column::Email.eq(account.email.as_str()));
    let now = Utc::now();
    let model = user::ActiveModel {
        school_id: Set(school_id),
        email: Set(account.email),
        full_name: Set(account.full_name),
        full_name_ar: Set(account.full_name_ar),
        role: Set(account.role),
        password_hash: Set(password_hash.to_owned()),
        phone: Set(account.phone),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    find_or_create::<user::Entity>(db, key, model).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn school_year_turns_over_in_september() {
        let d = |y, m, dd| NaiveDate::from_ymd_opt(y, m, dd).unwrap();
        assert_eq!(school_year_start(d(2025, 8, 31)), 2024);
        assert_eq!(school_year_start(d(2025, 9, 1)), 2025);
        assert_eq!(school_year_start(d(2026, 1, 15)), 2025);
    }

    #[test]
    fn builtin_registry_is_valid() {
        let registry = registry().unwrap();
        assert_eq!(
            registry.execution_order(),
            [
                "school",
                "users",
                "academic",
                "people",
                "classes",
                "attendance",
                "grades",
                "finance",
                "library",
                "announcements",
            ]
        );
        for (name, description) in registry.listing() {
            assert!(!description.is_empty(), "{name} has no description");
        }
    }

    #[test]
    fn impossible_dates_are_errors() {
        assert!(matches!(
            date(2025, 2, 30),
            Err(SeedError::InvalidDate { month: 2, day: 30, .. })
        ));
    }
}
