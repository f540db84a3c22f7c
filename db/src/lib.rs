pub mod models;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config;

/// Opens the connection configured by `DATABASE_PATH`.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    connect_to(&database_url(&config::database_path())).await
}

/// Opens a connection to an explicit URL; SQL statement logging is kept at debug.
pub async fn connect_to(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url.to_owned());
    options.sqlx_logging_level(log::LevelFilter::Debug);
    log::info!("Connecting to {url}");
    Database::connect(options).await
}

/// Turns a configured path into a DSN.
///
/// DSNs are passed through as-is; anything else is treated as a SQLite file
/// path. Its parent directory is created since SQLite won't create
/// intermediate dirs.
pub fn database_url(path_or_url: &str) -> String {
    if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("mysql://")
    {
        return path_or_url.to_owned();
    }

    if let Some(parent) = Path::new(path_or_url).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    format!("sqlite://{path_or_url}?mode=rwc")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dsn_is_passed_through() {
        assert_eq!(database_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(database_url("postgres://u@h/db"), "postgres://u@h/db");
    }

    #[test]
    fn file_path_becomes_sqlite_url_with_parent_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/school.db");
        let url = database_url(path.to_str().unwrap());
        assert_eq!(url, format!("sqlite://{}?mode=rwc", path.display()));
        assert!(path.parent().unwrap().exists());
    }
}
