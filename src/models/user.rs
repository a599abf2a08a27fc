//! User model
//!
//! A user profile with its current macro targets. Targets here are mutable;
//! the historical record lives in each log entry's snapshot.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::MacroTargets;
use crate::db::DbResult;

/// A user with their current targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub targets: MacroTargets,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Create a User from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            targets: MacroTargets {
                kcal: row.get("target_kcal")?,
                protein: row.get("target_protein")?,
                carbs: row.get("target_carbs")?,
                fat: row.get("target_fat")?,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new user with the given targets
    pub fn create(conn: &Connection, name: &str, targets: &MacroTargets) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO users (name, target_kcal, target_protein, target_carbs, target_fat)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                name,
                targets.kcal,
                targets.protein,
                targets.carbs,
                targets.fat,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a user by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by name
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE name = ?1")?;

        let result = stmt.query_row([name], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a user's current targets.
    /// Existing log entry snapshots are untouched by this.
    pub fn update_targets(
        conn: &Connection,
        id: i64,
        targets: &MacroTargets,
    ) -> DbResult<Option<Self>> {
        conn.execute(
            r#"
            UPDATE users SET
                target_kcal = ?1,
                target_protein = ?2,
                target_carbs = ?3,
                target_fat = ?4,
                updated_at = datetime('now')
            WHERE id = ?5
            "#,
            params![
                targets.kcal,
                targets.protein,
                targets.carbs,
                targets.fat,
                id,
            ],
        )?;

        Self::get_by_id(conn, id)
    }
}
