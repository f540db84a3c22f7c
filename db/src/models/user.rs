use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents a login account in the `users` table.
///
/// Teachers, students and guardians each own exactly one account; staff
/// accounts have no profile row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    /// Unique per school.
    pub email: String,
    pub full_name: String,
    pub full_name_ar: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// School-wide role of an account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Display, EnumString,
    Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "principal")]
    Principal,
    #[sea_orm(string_value = "accountant")]
    Accountant,
    #[sea_orm(string_value = "librarian")]
    Librarian,
    #[sea_orm(string_value = "registrar")]
    Registrar,
    #[sea_orm(string_value = "teacher")]
    Teacher,
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "guardian")]
    Guardian,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::school::Entity",
        from = "Column::SchoolId",
        to = "super::school::Column::Id",
        on_delete = "Cascade"
    )]
    School,
}

impl Related<super::school::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub use argon2::password_hash::Error as PasswordHashError;

/// Hashes a plain-text password with Argon2 and a random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

impl Model {
    /// Checks `password` against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        PasswordHash::new(&self.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_strum() {
        assert_eq!(Role::Accountant.to_string(), "accountant");
        assert_eq!(Role::from_str("GUARDIAN").unwrap(), Role::Guardian);
    }

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("Demo@12345").unwrap();
        let now = Utc::now();
        let user = Model {
            id: 1,
            school_id: 1,
            email: "admin@demo.school.sa".into(),
            full_name: "Admin".into(),
            full_name_ar: "المدير".into(),
            role: Role::Admin,
            password_hash: hash,
            phone: None,
            created_at: now,
            updated_at: now,
        };
        assert!(user.verify_password("Demo@12345"));
        assert!(!user.verify_password("wrong"));
    }
}
