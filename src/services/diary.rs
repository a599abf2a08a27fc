//! Diary service
//!
//! Logging consumption events and producing the per-day summary. The
//! user's current targets are baked into each new entry as a write-once
//! snapshot, so later profile edits never rewrite past days.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::models::{
    ConsumedSource, FoodItem, LogEntry, LogEntryCreate, LogEntryDetail, MacroTargets, Macros,
    Recipe, User,
};
use crate::nutrition::{aggregate_day, compute_entry_macros};

use super::{validate_grams, ServiceError, ServiceResult};

/// Request to log one consumption event
#[derive(Debug, Clone)]
pub struct LogConsumptionRequest {
    pub user_id: i64,
    pub date: NaiveDate,
    /// Exactly one of food_item_id / recipe_id must be set
    pub food_item_id: Option<i64>,
    pub recipe_id: Option<i64>,
    pub grams: f64,
}

/// Response for log_consumption
#[derive(Debug, Serialize)]
pub struct LogEntryResponse {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: String,
    pub name: String,
    pub grams: f64,
    pub macros: Macros,
    pub target_snapshot: MacroTargets,
}

/// One entry line in a day summary
#[derive(Debug, Serialize)]
pub struct DayEntry {
    pub id: i64,
    /// "food", "recipe" or "unresolved"
    pub kind: String,
    pub name: Option<String>,
    pub grams: f64,
    pub macros: Macros,
}

/// A full day view: rounded totals, per-entry macros and the day's
/// effective target
#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub totals: Macros,
    /// The day's first snapshot when the day has entries carrying one;
    /// the user's current targets otherwise
    pub target: MacroTargets,
    pub entries: Vec<DayEntry>,
}

fn day_entry(detail: &LogEntryDetail) -> DayEntry {
    let (kind, name) = match &detail.source {
        ConsumedSource::Food(food) => ("food", Some(food.name.clone())),
        ConsumedSource::Recipe(recipe) => ("recipe", Some(recipe.name.clone())),
        ConsumedSource::Unresolved => ("unresolved", None),
    };

    DayEntry {
        id: detail.id,
        kind: kind.to_string(),
        name,
        grams: detail.grams,
        // Per-entry display values; day totals are summed at full
        // precision separately.
        macros: compute_entry_macros(detail).rounded(),
    }
}

/// Log a consumption event, snapshotting the user's current targets
pub fn log_consumption(db: &Database, req: LogConsumptionRequest) -> ServiceResult<LogEntryResponse> {
    validate_grams(req.grams, "grams")?;

    match (req.food_item_id, req.recipe_id) {
        (Some(_), Some(_)) => {
            return Err(ServiceError::InvalidInput(
                "provide either food_item_id or recipe_id, not both".to_string(),
            ))
        }
        (None, None) => {
            return Err(ServiceError::InvalidInput(
                "one of food_item_id or recipe_id is required".to_string(),
            ))
        }
        _ => {}
    }

    let conn = db.get_conn()?;

    let user = User::get_by_id(&conn, req.user_id)?.ok_or(ServiceError::UserNotFound(req.user_id))?;

    if let Some(food_item_id) = req.food_item_id {
        if FoodItem::get_by_id(&conn, food_item_id)?.is_none() {
            return Err(ServiceError::FoodNotFound(food_item_id));
        }
    }
    if let Some(recipe_id) = req.recipe_id {
        if Recipe::get_by_id(&conn, recipe_id)?.is_none() {
            return Err(ServiceError::RecipeNotFound(recipe_id));
        }
    }

    let entry = LogEntry::create(
        &conn,
        &LogEntryCreate {
            user_id: req.user_id,
            date: req.date,
            food_item_id: req.food_item_id,
            recipe_id: req.recipe_id,
            grams: req.grams,
            target_snapshot: user.targets,
        },
    )?;

    tracing::debug!(entry_id = entry.id, user_id = req.user_id, date = %req.date, "log entry created");

    let detail = entry.resolve(&conn)?;
    let line = day_entry(&detail);

    Ok(LogEntryResponse {
        id: entry.id,
        date: entry.date,
        kind: line.kind,
        name: line.name.unwrap_or_default(),
        grams: entry.grams,
        macros: line.macros,
        target_snapshot: user.targets,
    })
}

/// Delete a log entry owned by the given user
pub fn delete_entry(db: &Database, user_id: i64, entry_id: i64) -> ServiceResult<()> {
    let conn = db.get_conn()?;

    let entry = LogEntry::get_by_id(&conn, entry_id)?.ok_or(ServiceError::EntryNotFound(entry_id))?;
    if entry.user_id != user_id {
        return Err(ServiceError::EntryNotFound(entry_id));
    }

    LogEntry::delete(&conn, entry_id)?;
    tracing::debug!(entry_id, user_id, "log entry deleted");

    Ok(())
}

/// Produce the summary for one user-day
pub fn day_summary(db: &Database, user_id: i64, date: NaiveDate) -> ServiceResult<DaySummary> {
    let conn = db.get_conn()?;

    let user = User::get_by_id(&conn, user_id)?.ok_or(ServiceError::UserNotFound(user_id))?;
    let details = LogEntry::get_details_for_date(&conn, user_id, date)?;

    // Historical days display against the targets in force when they were
    // logged; only a day with no snapshots falls back to the current ones.
    let target = details
        .iter()
        .find_map(|d| d.target_snapshot)
        .unwrap_or(user.targets);

    Ok(DaySummary {
        date,
        totals: aggregate_day(&details),
        target,
        entries: details.iter().map(day_entry).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;
    use crate::models::{FoodItemCreate, IngredientSpec};
    use crate::services::{catalog, targets};

    fn setup_user(db: &Database) -> i64 {
        targets::create_user(db, "daniel", None).unwrap().id
    }

    fn setup_food(db: &Database, name: &str, kcal: f64, protein: f64) -> i64 {
        catalog::add_food(
            db,
            FoodItemCreate {
                name: name.to_string(),
                kcal_100g: kcal,
                protein_100g: protein,
                carbs_100g: 0.0,
                fat_100g: 0.0,
            },
        )
        .unwrap()
        .id
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()
    }

    #[test]
    fn test_log_requires_exactly_one_source() {
        let db = test_db();
        let user_id = setup_user(&db);
        let food_id = setup_food(&db, "turkey", 100.0, 20.0);

        let both = log_consumption(
            &db,
            LogConsumptionRequest {
                user_id,
                date: date(),
                food_item_id: Some(food_id),
                recipe_id: Some(1),
                grams: 100.0,
            },
        );
        assert!(matches!(both, Err(ServiceError::InvalidInput(_))));

        let neither = log_consumption(
            &db,
            LogConsumptionRequest {
                user_id,
                date: date(),
                food_item_id: None,
                recipe_id: None,
                grams: 100.0,
            },
        );
        assert!(matches!(neither, Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn test_log_rejects_non_positive_grams() {
        let db = test_db();
        let user_id = setup_user(&db);
        let food_id = setup_food(&db, "turkey", 100.0, 20.0);

        for grams in [0.0, -50.0, f64::NAN, f64::INFINITY] {
            let res = log_consumption(
                &db,
                LogConsumptionRequest {
                    user_id,
                    date: date(),
                    food_item_id: Some(food_id),
                    recipe_id: None,
                    grams,
                },
            );
            assert!(matches!(res, Err(ServiceError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_snapshot_taken_at_creation_survives_target_edits() {
        let db = test_db();
        let user_id = setup_user(&db);
        let food_id = setup_food(&db, "turkey", 100.0, 20.0);

        let entry = log_consumption(
            &db,
            LogConsumptionRequest {
                user_id,
                date: date(),
                food_item_id: Some(food_id),
                recipe_id: None,
                grams: 150.0,
            },
        )
        .unwrap();
        assert_eq!(entry.target_snapshot.kcal, 2000.0);

        // Edit the profile targets afterwards
        targets::update_targets(
            &db,
            user_id,
            MacroTargets {
                kcal: 1500.0,
                protein: 120.0,
                carbs: 150.0,
                fat: 50.0,
            },
        )
        .unwrap();

        // The logged day still shows the snapshot in force at log time
        let summary = day_summary(&db, user_id, date()).unwrap();
        assert_eq!(summary.target.kcal, 2000.0);

        // And the stored row is untouched
        let conn = db.get_conn().unwrap();
        let stored = LogEntry::get_by_id(&conn, entry.id).unwrap().unwrap();
        assert_eq!(stored.target_snapshot.unwrap().kcal, 2000.0);
        // Release the pooled connection: the in-memory test pool holds a
        // single connection, and day_summary below needs it.
        drop(conn);

        // A day with no entries falls back to the current targets
        let empty_day = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let summary = day_summary(&db, user_id, empty_day).unwrap();
        assert_eq!(summary.target.kcal, 1500.0);
        assert!(summary.entries.is_empty());
        assert_eq!(summary.totals.kcal, 0.0);
    }

    #[test]
    fn test_day_summary_mixes_foods_and_recipes() {
        let db = test_db();
        let user_id = setup_user(&db);
        let turkey = setup_food(&db, "turkey", 100.0, 20.0);
        let oats = setup_food(&db, "oats", 380.0, 12.0);

        let recipe = catalog::create_recipe(
            &db,
            "oat mix",
            vec![
                IngredientSpec {
                    food_item_id: turkey,
                    grams: 100.0,
                },
                IngredientSpec {
                    food_item_id: oats,
                    grams: 100.0,
                },
            ],
        )
        .unwrap();

        log_consumption(
            &db,
            LogConsumptionRequest {
                user_id,
                date: date(),
                food_item_id: Some(turkey),
                recipe_id: None,
                grams: 150.0,
            },
        )
        .unwrap();

        // Half of a 200g recipe totalling 480 kcal
        log_consumption(
            &db,
            LogConsumptionRequest {
                user_id,
                date: date(),
                food_item_id: None,
                recipe_id: Some(recipe.id),
                grams: 100.0,
            },
        )
        .unwrap();

        let summary = day_summary(&db, user_id, date()).unwrap();
        assert_eq!(summary.entries.len(), 2);
        // 150 kcal from turkey + 240 kcal from the half recipe
        assert_eq!(summary.totals.kcal, 390.0);
        // 30g protein + 16g protein
        assert_eq!(summary.totals.protein, 46.0);
    }

    #[test]
    fn test_delete_entry_checks_ownership() {
        let db = test_db();
        let user_id = setup_user(&db);
        let other_id = targets::create_user(&db, "other", None).unwrap().id;
        let food_id = setup_food(&db, "turkey", 100.0, 20.0);

        let entry = log_consumption(
            &db,
            LogConsumptionRequest {
                user_id,
                date: date(),
                food_item_id: Some(food_id),
                recipe_id: None,
                grams: 100.0,
            },
        )
        .unwrap();

        let err = delete_entry(&db, other_id, entry.id).unwrap_err();
        assert!(matches!(err, ServiceError::EntryNotFound(_)));

        delete_entry(&db, user_id, entry.id).unwrap();
        let summary = day_summary(&db, user_id, date()).unwrap();
        assert!(summary.entries.is_empty());
    }
}
