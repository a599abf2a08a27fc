//! Food Item model
//!
//! A food item is a nutrient density record: the four macros per 100 grams.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::Macros;
use crate::db::DbResult;

/// A food item with its per-100g nutrient density
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub per_100g: Macros,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemCreate {
    pub name: String,
    pub kcal_100g: f64,
    #[serde(default)]
    pub protein_100g: f64,
    #[serde(default)]
    pub carbs_100g: f64,
    #[serde(default)]
    pub fat_100g: f64,
}

/// Data for updating a food item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodItemUpdate {
    pub name: Option<String>,
    pub kcal_100g: Option<f64>,
    pub protein_100g: Option<f64>,
    pub carbs_100g: Option<f64>,
    pub fat_100g: Option<f64>,
}

impl FoodItem {
    /// Create a FoodItem from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            per_100g: Macros {
                kcal: row.get("kcal_100g")?,
                protein: row.get("protein_100g")?,
                carbs: row.get("carbs_100g")?,
                fat: row.get("fat_100g")?,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new food item into the database
    pub fn create(conn: &Connection, data: &FoodItemCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_items (name, kcal_100g, protein_100g, carbs_100g, fat_100g)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.name,
                data.kcal_100g,
                data.protein_100g,
                data.carbs_100g,
                data.fat_100g,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a food item by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_items WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Search food items by name
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", query);
        let mut stmt = conn.prepare(
            "SELECT * FROM food_items WHERE name LIKE ?1 ORDER BY name ASC LIMIT ?2",
        )?;

        let items = stmt
            .query_map(params![search_pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// List food items ordered by name
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM food_items ORDER BY name ASC LIMIT ?1 OFFSET ?2")?;

        let items = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Update a food item.
    ///
    /// Edits change the food's current density only; log entries store no
    /// macro values of their own, so historical rows are never rewritten.
    pub fn update(conn: &Connection, id: i64, data: &FoodItemUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(name, "name");
        add_update!(kcal_100g, "kcal_100g");
        add_update!(protein_100g, "protein_100g");
        add_update!(carbs_100g, "carbs_100g");
        add_update!(fat_100g, "fat_100g");

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE food_items SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Get the count of recipe ingredients referencing this food item
    pub fn get_recipe_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE food_item_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get the count of log entries referencing this food item directly
    pub fn get_log_usage_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM log_entries WHERE food_item_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get recipe names that use this food item
    pub fn get_used_in_recipes(conn: &Connection, id: i64) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT r.name FROM recipes r
            INNER JOIN recipe_ingredients ri ON r.id = ri.recipe_id
            WHERE ri.food_item_id = ?1
            ORDER BY r.name
            "#,
        )?;

        let names = stmt
            .query_map([id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(names)
    }

    /// Count total food items
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM food_items", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a food item.
    /// Returns Ok(true) if deleted, Ok(false) if not found.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(false);
        }

        // Fails on the RESTRICT foreign keys if still referenced; callers
        // run the friendly usage check first.
        let rows = conn.execute("DELETE FROM food_items WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
