//! Recipe Ingredient model
//!
//! A gram quantity of one food item inside a recipe. The ingredient set of
//! a recipe is replaced wholesale on edit, never patched row by row.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::FoodItem;
use crate::db::DbResult;

/// A recipe ingredient linking a food item to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub food_item_id: i64,
    pub grams: f64,
    pub created_at: String,
}

/// Ingredient payload when creating or replacing a recipe's ingredient set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientSpec {
    pub food_item_id: i64,
    pub grams: f64,
}

/// An ingredient with its food item resolved.
///
/// `food` is None when the referenced food no longer exists; the nutrition
/// engine treats such an ingredient as contributing zero macros.
#[derive(Debug, Clone)]
pub struct IngredientDetail {
    pub id: i64,
    pub food_item_id: i64,
    pub grams: f64,
    pub food: Option<FoodItem>,
}

impl RecipeIngredient {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            food_item_id: row.get("food_item_id")?,
            grams: row.get("grams")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert one ingredient row
    pub fn insert(conn: &Connection, recipe_id: i64, spec: &IngredientSpec) -> DbResult<()> {
        conn.execute(
            "INSERT INTO recipe_ingredients (recipe_id, food_item_id, grams) VALUES (?1, ?2, ?3)",
            params![recipe_id, spec.food_item_id, spec.grams],
        )?;
        Ok(())
    }

    /// Replace a recipe's entire ingredient set (delete-all-then-reinsert).
    /// Callers wrap this in a transaction together with any recipe-row edit.
    pub fn replace_for_recipe(
        conn: &Connection,
        recipe_id: i64,
        specs: &[IngredientSpec],
    ) -> DbResult<()> {
        conn.execute(
            "DELETE FROM recipe_ingredients WHERE recipe_id = ?1",
            [recipe_id],
        )?;
        for spec in specs {
            Self::insert(conn, recipe_id, spec)?;
        }
        Ok(())
    }

    /// Get all ingredients for a recipe
    pub fn get_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM recipe_ingredients WHERE recipe_id = ?1 ORDER BY id")?;

        let ingredients = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Get ingredients for a recipe with each food item resolved.
    /// A dangling food reference resolves to None rather than an error.
    pub fn get_details_for_recipe(
        conn: &Connection,
        recipe_id: i64,
    ) -> DbResult<Vec<IngredientDetail>> {
        let ingredients = Self::get_for_recipe(conn, recipe_id)?;

        let mut details = Vec::with_capacity(ingredients.len());
        for ingredient in ingredients {
            let food = FoodItem::get_by_id(conn, ingredient.food_item_id)?;
            details.push(IngredientDetail {
                id: ingredient.id,
                food_item_id: ingredient.food_item_id,
                grams: ingredient.grams,
                food,
            });
        }

        Ok(details)
    }
}
