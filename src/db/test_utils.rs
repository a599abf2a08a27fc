//! Test fixtures for database-backed tests

use super::{migrations, Database};

/// Fresh in-memory database with the full schema applied
pub fn test_db() -> Database {
    let db = Database::in_memory().expect("in-memory database");
    db.with_conn(|conn| migrations::run_migrations(conn))
        .expect("migrations");
    db
}
