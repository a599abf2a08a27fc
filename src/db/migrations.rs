//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- Profile with current (mutable) macro targets
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,

            -- Current targets; edits here never touch log snapshots
            target_kcal REAL NOT NULL DEFAULT 2000,
            target_protein REAL NOT NULL DEFAULT 150,
            target_carbs REAL NOT NULL DEFAULT 200,
            target_fat REAL NOT NULL DEFAULT 60,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- FOOD ITEMS
        -- Nutrient density per 100 grams
        -- ============================================
        CREATE TABLE food_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,

            kcal_100g REAL NOT NULL DEFAULT 0,
            protein_100g REAL NOT NULL DEFAULT 0,  -- grams
            carbs_100g REAL NOT NULL DEFAULT 0,    -- grams
            fat_100g REAL NOT NULL DEFAULT 0,      -- grams

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_items_name ON food_items(name);

        -- ============================================
        -- RECIPES
        -- Named ingredient sets; total weight is derived, never stored
        -- ============================================
        CREATE TABLE recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipes_name ON recipes(name);

        -- ============================================
        -- RECIPE INGREDIENTS
        -- Junction table: gram quantities of food items per recipe.
        -- Replaced wholesale on recipe edit.
        -- ============================================
        CREATE TABLE recipe_ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            food_item_id INTEGER NOT NULL REFERENCES food_items(id) ON DELETE RESTRICT,
            grams REAL NOT NULL CHECK (grams > 0),

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id);
        CREATE INDEX idx_recipe_ingredients_food ON recipe_ingredients(food_item_id);

        -- ============================================
        -- LOG ENTRIES
        -- One consumption event: either a food or a recipe, in grams.
        -- Carries a write-once snapshot of the user's targets taken at
        -- creation time; there is no UPDATE path for this table.
        -- ============================================
        CREATE TABLE log_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"

            -- Source: either a food item OR a recipe (one must be set, not both)
            food_item_id INTEGER REFERENCES food_items(id) ON DELETE RESTRICT,
            recipe_id INTEGER REFERENCES recipes(id) ON DELETE RESTRICT,

            grams REAL NOT NULL,                 -- quantity consumed

            -- Target snapshot (nullable for historically imported rows;
            -- always written as a complete set of four)
            target_kcal REAL,
            target_protein REAL,
            target_carbs REAL,
            target_fat REAL,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),

            CHECK ((food_item_id IS NOT NULL AND recipe_id IS NULL) OR
                   (food_item_id IS NULL AND recipe_id IS NOT NULL))
        );

        CREATE INDEX idx_log_entries_user_date ON log_entries(user_id, date);
        CREATE INDEX idx_log_entries_food ON log_entries(food_item_id);
        CREATE INDEX idx_log_entries_recipe ON log_entries(recipe_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
