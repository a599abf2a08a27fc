//! Utility to create the database with a demo user, catalog and a few
//! days of log entries

use std::path::PathBuf;

use chrono::{Duration, Local};
use tracing_subscriber::EnvFilter;

use nutrilog::models::{FoodItemCreate, IngredientSpec};
use nutrilog::services::diary::{log_consumption, LogConsumptionRequest};
use nutrilog::services::{catalog, diary, targets};

fn get_database_path() -> PathBuf {
    std::env::var("NUTRILOG_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            std::fs::create_dir_all(&path).ok();
            path.push("nutrilog.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let db = nutrilog::db::Database::new(&db_path)?;
    db.with_conn(|conn| nutrilog::db::migrations::run_migrations(conn))?;

    let user = targets::create_user(&db, "Daniel", None)?;
    println!("User created: {} (id {})", user.name, user.id);

    let turkey = catalog::add_food(
        &db,
        FoodItemCreate {
            name: "Turkey breast".to_string(),
            kcal_100g: 104.0,
            protein_100g: 22.0,
            carbs_100g: 0.5,
            fat_100g: 1.7,
        },
    )?;
    let oats = catalog::add_food(
        &db,
        FoodItemCreate {
            name: "Rolled oats".to_string(),
            kcal_100g: 379.0,
            protein_100g: 13.2,
            carbs_100g: 67.7,
            fat_100g: 6.5,
        },
    )?;
    let milk = catalog::add_food(
        &db,
        FoodItemCreate {
            name: "Whole milk".to_string(),
            kcal_100g: 64.0,
            protein_100g: 3.4,
            carbs_100g: 4.8,
            fat_100g: 3.6,
        },
    )?;
    let peanut_butter = catalog::add_food(
        &db,
        FoodItemCreate {
            name: "Peanut butter".to_string(),
            kcal_100g: 598.0,
            protein_100g: 22.2,
            carbs_100g: 22.3,
            fat_100g: 51.1,
        },
    )?;
    println!("Foods created: 4");

    let shake = catalog::create_recipe(
        &db,
        "Protein shake",
        vec![
            IngredientSpec {
                food_item_id: oats.id,
                grams: 40.0,
            },
            IngredientSpec {
                food_item_id: milk.id,
                grams: 250.0,
            },
            IngredientSpec {
                food_item_id: peanut_butter.id,
                grams: 30.0,
            },
        ],
    )?;
    println!(
        "Recipe created: {} ({} g, {:.0} kcal per batch)",
        shake.name, shake.total_weight, shake.batch_macros.kcal
    );

    let today = Local::now().date_naive();
    for days_ago in 0..3 {
        let date = today - Duration::days(days_ago);
        log_consumption(
            &db,
            LogConsumptionRequest {
                user_id: user.id,
                date,
                food_item_id: Some(turkey.id),
                recipe_id: None,
                grams: 180.0,
            },
        )?;
        log_consumption(
            &db,
            LogConsumptionRequest {
                user_id: user.id,
                date,
                food_item_id: None,
                recipe_id: Some(shake.id),
                grams: 160.0,
            },
        )?;
    }
    println!("Logged 3 days of entries");

    let summary = diary::day_summary(&db, user.id, today)?;
    println!(
        "Today: {:.1}/{:.0} kcal, {:.1} g protein",
        summary.totals.kcal, summary.target.kcal, summary.totals.protein
    );

    Ok(())
}
