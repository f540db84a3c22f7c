//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete seeder configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub school_domain: String,
    pub school_name: String,
    pub school_name_ar: String,
    pub demo_password: String,
    pub rng_seed: u64,
    pub year_levels: usize,
    pub sections_per_level: usize,
    pub students_per_level: usize,
    pub teachers: usize,
    pub attendance_days: usize,
    pub graded_terms: usize,
    pub library_loans: usize,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

/// Reads `key` and parses it, falling back to `default` when unset or malformed.
fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every variable has a default so the seeder can run against a fresh
    /// checkout without any `.env` file.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "school-seeder".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "logs/seeder.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "data/school.db".into()),
            school_domain: env::var("SCHOOL_DOMAIN").unwrap_or_else(|_| "demo.school.sa".into()),
            school_name: env::var("SCHOOL_NAME")
                .unwrap_or_else(|_| "Al Noor International School".into()),
            school_name_ar: env::var("SCHOOL_NAME_AR")
                .unwrap_or_else(|_| "مدرسة النور العالمية".into()),
            demo_password: env::var("DEMO_PASSWORD").unwrap_or_else(|_| "Demo@12345".into()),
            rng_seed: parsed("SEED_RNG_SEED", 20_250_901),
            year_levels: parsed("SEED_YEAR_LEVELS", 12),
            sections_per_level: parsed("SEED_SECTIONS_PER_LEVEL", 2),
            students_per_level: parsed("SEED_STUDENTS_PER_LEVEL", 20),
            teachers: parsed("SEED_TEACHERS", 24),
            attendance_days: parsed("SEED_ATTENDANCE_DAYS", 5),
            graded_terms: parsed("SEED_GRADED_TERMS", 2),
            library_loans: parsed("SEED_LIBRARY_LOANS", 30),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    /// Override `database_path`, e.g. to point a run at a scratch database.
    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_school_domain(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.school_domain = value.into());
    }

    pub fn set_rng_seed(value: u64) {
        AppConfig::set_field(|cfg| cfg.rng_seed = value);
    }
}

// --- Free accessors, read straight from the global instance ---

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn defaults_apply_when_variables_are_unset() {
        unsafe {
            env::remove_var("SEED_TEACHERS");
            env::remove_var("SCHOOL_DOMAIN");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.teachers, 24);
        assert_eq!(cfg.school_domain, "demo.school.sa");
    }

    #[test]
    #[serial]
    fn malformed_numbers_fall_back_to_default() {
        unsafe {
            env::set_var("SEED_STUDENTS_PER_LEVEL", "lots");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.students_per_level, 20);
        unsafe {
            env::remove_var("SEED_STUDENTS_PER_LEVEL");
        }
    }

    #[test]
    #[serial]
    fn setters_override_the_global_instance() {
        AppConfig::set_school_domain("override.school.sa");
        assert_eq!(AppConfig::global().school_domain, "override.school.sa");
        AppConfig::reset();
        assert_ne!(AppConfig::global().school_domain, "override.school.sa");
    }
}
