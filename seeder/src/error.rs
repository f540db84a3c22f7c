use crate::refs::EntityKind;
use db::models::user::PasswordHashError;
use sea_orm::DbErr;
use thiserror::Error;

pub type SeedResult<T> = Result<T, SeedError>;

/// Everything that can stop a seeding run.
///
/// Precondition errors are raised before any write. Database errors other
/// than the unique-key races handled in `persist` always end up here.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("school `{domain}` does not exist; run the `school` phase first")]
    MissingTenant { domain: String },

    #[error("phase `{phase}` needs {kind} records but none exist; run the `{provider}` phase first")]
    MissingPrerequisite {
        phase: String,
        kind: EntityKind,
        provider: String,
    },

    #[error("unknown phase `{0}`; use `run --list` to see registered phases")]
    UnknownPhase(String),

    #[error("phase `{0}` is registered twice")]
    DuplicatePhase(String),

    #[error("phase `{phase}` consumes {kind} records but no registered phase provides them")]
    UnknownProvider { phase: String, kind: EntityKind },

    #[error("{kind} records are provided by both `{first}` and `{second}`")]
    DuplicateProvider {
        kind: EntityKind,
        first: String,
        second: String,
    },

    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("dependency cycle between phases: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),

    #[error("phase `{phase}` failed: {source}")]
    PhaseFailed {
        phase: String,
        #[source]
        source: Box<SeedError>,
    },

    #[error("database error: {0}")]
    Db(#[from] DbErr),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl From<PasswordHashError> for SeedError {
    fn from(err: PasswordHashError) -> Self {
        SeedError::PasswordHash(err.to_string())
    }
}

impl SeedError {
    /// A prerequisite raised from inside a phase, naming the built-in provider.
    pub fn missing(phase: &str, kind: EntityKind) -> Self {
        SeedError::MissingPrerequisite {
            phase: phase.to_owned(),
            kind,
            provider: kind.provided_by().to_owned(),
        }
    }

    /// True when the run was refused before writing anything.
    pub fn is_precondition(&self) -> bool {
        match self {
            SeedError::MissingTenant { .. } | SeedError::MissingPrerequisite { .. } => true,
            SeedError::PhaseFailed { source, .. } => source.is_precondition(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_names_the_provider() {
        let err = SeedError::missing("classes", EntityKind::SchoolYear);
        assert_eq!(
            err.to_string(),
            "phase `classes` needs school_year records but none exist; run the `academic` phase first"
        );
        assert!(err.is_precondition());
    }

    #[test]
    fn database_errors_are_not_preconditions() {
        let err = SeedError::PhaseFailed {
            phase: "grades".into(),
            source: Box::new(SeedError::Db(DbErr::Custom("boom".into()))),
        };
        assert!(!err.is_precondition());
        let message = err.to_string();
        assert!(message.starts_with("phase `grades` failed: database error:"));
        assert!(message.contains("boom"));
    }

    #[test]
    fn hashing_failures_are_not_database_errors() {
        let err = SeedError::from(PasswordHashError::Password);
        assert!(matches!(err, SeedError::PasswordHash(_)));
        assert!(err.to_string().starts_with("password hashing failed:"));
        assert!(!err.is_precondition());
    }
}
