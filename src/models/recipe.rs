//! Recipe model
//!
//! A named set of ingredients. Total weight is derived from the ingredient
//! grams on every read and never stored.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::recipe_ingredient::{IngredientDetail, RecipeIngredient};
use crate::db::DbResult;

/// A recipe row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A recipe with its ingredients resolved, ready for macro calculation
#[derive(Debug, Clone)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<IngredientDetail>,
}

impl RecipeDetail {
    /// Derived total weight: the sum of ingredient grams.
    /// An ingredient-less recipe weighs 0.
    pub fn total_weight(&self) -> f64 {
        self.ingredients.iter().map(|i| i.grams).sum()
    }
}

impl Recipe {
    /// Create a Recipe from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new recipe row (ingredients are inserted separately, in the
    /// same transaction)
    pub fn create(conn: &Connection, name: &str) -> DbResult<Self> {
        conn.execute("INSERT INTO recipes (name) VALUES (?1)", params![name])?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a recipe with its ingredients and their foods resolved
    pub fn get_detail(conn: &Connection, id: i64) -> DbResult<Option<RecipeDetail>> {
        let recipe = match Self::get_by_id(conn, id)? {
            Some(recipe) => recipe,
            None => return Ok(None),
        };

        let ingredients = RecipeIngredient::get_details_for_recipe(conn, id)?;

        Ok(Some(RecipeDetail {
            id: recipe.id,
            name: recipe.name,
            ingredients,
        }))
    }

    /// List recipes ordered by name
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM recipes ORDER BY name ASC LIMIT ?1 OFFSET ?2")?;

        let recipes = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Rename a recipe
    pub fn rename(conn: &Connection, id: i64, name: &str) -> DbResult<Option<Self>> {
        conn.execute(
            "UPDATE recipes SET name = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![name, id],
        )?;
        Self::get_by_id(conn, id)
    }

    /// Count recipes
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get the count of log entries referencing this recipe
    pub fn get_log_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM log_entries WHERE recipe_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a recipe. Ingredient rows go with it via the CASCADE foreign
    /// key; the RESTRICT key on log_entries blocks deletion while logged.
    /// Returns Ok(true) if deleted, Ok(false) if not found.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(false);
        }

        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
