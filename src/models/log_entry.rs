//! Log Entry model
//!
//! One consumption event: a gram quantity of either a food item or a
//! recipe, dated and owned by a user. Each entry carries a write-once
//! snapshot of the user's targets taken at creation time, which keeps
//! past-day displays stable across later target edits. Entries are
//! created and deleted, never updated.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::recipe::RecipeDetail;
use super::{FoodItem, MacroTargets, Recipe};
use crate::db::DbResult;

/// A log entry as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub food_item_id: Option<i64>,
    pub recipe_id: Option<i64>,
    pub grams: f64,
    /// Targets copied from the user's profile when the entry was created.
    /// None only for rows imported before snapshots existed.
    pub target_snapshot: Option<MacroTargets>,
    pub created_at: String,
}

/// Data for creating a log entry.
/// The snapshot is filled in by the diary service from the user's current
/// targets at the moment of creation.
#[derive(Debug, Clone)]
pub struct LogEntryCreate {
    pub user_id: i64,
    pub date: NaiveDate,
    pub food_item_id: Option<i64>,
    pub recipe_id: Option<i64>,
    pub grams: f64,
    pub target_snapshot: MacroTargets,
}

/// What a log entry resolved to.
///
/// Unresolved covers both a row with neither reference set and a reference
/// whose food or recipe has vanished; the nutrition engine scores it as
/// zero macros instead of erroring.
#[derive(Debug, Clone)]
pub enum ConsumedSource {
    Food(FoodItem),
    Recipe(RecipeDetail),
    Unresolved,
}

/// A log entry with its consumed source resolved
#[derive(Debug, Clone)]
pub struct LogEntryDetail {
    pub id: i64,
    pub date: NaiveDate,
    pub grams: f64,
    pub source: ConsumedSource,
    pub target_snapshot: Option<MacroTargets>,
}

impl LogEntry {
    /// Create a LogEntry from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        // The four snapshot columns are written together; kcal stands in
        // for the set when deciding presence.
        let target_snapshot = match (
            row.get::<_, Option<f64>>("target_kcal")?,
            row.get::<_, Option<f64>>("target_protein")?,
            row.get::<_, Option<f64>>("target_carbs")?,
            row.get::<_, Option<f64>>("target_fat")?,
        ) {
            (Some(kcal), Some(protein), Some(carbs), Some(fat)) => Some(MacroTargets {
                kcal,
                protein,
                carbs,
                fat,
            }),
            _ => None,
        };

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            food_item_id: row.get("food_item_id")?,
            recipe_id: row.get("recipe_id")?,
            grams: row.get("grams")?,
            target_snapshot,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new log entry, snapshot included
    pub fn create(conn: &Connection, data: &LogEntryCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO log_entries (
                user_id, date, food_item_id, recipe_id, grams,
                target_kcal, target_protein, target_carbs, target_fat
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.user_id,
                data.date,
                data.food_item_id,
                data.recipe_id,
                data.grams,
                data.target_snapshot.kcal,
                data.target_snapshot.protein,
                data.target_snapshot.carbs,
                data.target_snapshot.fat,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a log entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM log_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all log entries for one user-day
    pub fn get_for_date(conn: &Connection, user_id: i64, date: NaiveDate) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM log_entries WHERE user_id = ?1 AND date = ?2 ORDER BY id",
        )?;

        let entries = stmt
            .query_map(params![user_id, date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Get all log entries for a user with date >= from_date
    pub fn get_since(conn: &Connection, user_id: i64, from_date: NaiveDate) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM log_entries WHERE user_id = ?1 AND date >= ?2 ORDER BY date, id",
        )?;

        let entries = stmt
            .query_map(params![user_id, from_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Resolve this entry's consumed source.
    /// Dangling references come back as Unresolved, not errors.
    pub fn resolve(&self, conn: &Connection) -> DbResult<LogEntryDetail> {
        let source = if let Some(food_item_id) = self.food_item_id {
            match FoodItem::get_by_id(conn, food_item_id)? {
                Some(food) => ConsumedSource::Food(food),
                None => ConsumedSource::Unresolved,
            }
        } else if let Some(recipe_id) = self.recipe_id {
            match Recipe::get_detail(conn, recipe_id)? {
                Some(recipe) => ConsumedSource::Recipe(recipe),
                None => ConsumedSource::Unresolved,
            }
        } else {
            ConsumedSource::Unresolved
        };

        Ok(LogEntryDetail {
            id: self.id,
            date: self.date,
            grams: self.grams,
            source,
            target_snapshot: self.target_snapshot,
        })
    }

    /// Get one user-day's entries with sources resolved
    pub fn get_details_for_date(
        conn: &Connection,
        user_id: i64,
        date: NaiveDate,
    ) -> DbResult<Vec<LogEntryDetail>> {
        let entries = Self::get_for_date(conn, user_id, date)?;
        entries.iter().map(|e| e.resolve(conn)).collect()
    }

    /// Get a user's entries with date >= from_date, sources resolved
    pub fn get_details_since(
        conn: &Connection,
        user_id: i64,
        from_date: NaiveDate,
    ) -> DbResult<Vec<LogEntryDetail>> {
        let entries = Self::get_since(conn, user_id, from_date)?;
        entries.iter().map(|e| e.resolve(conn)).collect()
    }

    /// Delete a log entry.
    /// Returns Ok(true) if deleted, Ok(false) if not found.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM log_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
