//! Fresh, fully migrated databases for tests.

use crate::connect_to;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

/// An in-memory SQLite database with every migration applied. Each call
/// gets a database of its own.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = connect_to("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");

    Migrator::up(&db, None)
        .await
        .expect("migrations should apply to an empty database");

    db
}
