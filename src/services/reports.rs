//! Adherence report service
//!
//! Computes the lookback window, fetches and resolves the window's log
//! entries and runs the adherence rollup over them.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::models::{LogEntry, User};
use crate::nutrition::adherence_stats;

use super::{ServiceError, ServiceResult};

/// Adherence rollup for one user over a lookback window
#[derive(Debug, Serialize)]
pub struct AdherenceReport {
    pub user_id: i64,
    pub window_days: i64,
    /// Earliest date included: today - window_days
    pub from_date: NaiveDate,
    pub days_with_data: u32,
    pub days_within_target: u32,
}

/// Adherence over the window ending today
pub fn adherence_report(db: &Database, user_id: i64, window_days: i64) -> ServiceResult<AdherenceReport> {
    adherence_report_as_of(db, user_id, window_days, Local::now().date_naive())
}

/// Adherence over the window ending at an explicit reference date
pub fn adherence_report_as_of(
    db: &Database,
    user_id: i64,
    window_days: i64,
    today: NaiveDate,
) -> ServiceResult<AdherenceReport> {
    if window_days <= 0 {
        return Err(ServiceError::InvalidInput(
            "window_days must be positive".to_string(),
        ));
    }

    let conn = db.get_conn()?;

    if User::get_by_id(&conn, user_id)?.is_none() {
        return Err(ServiceError::UserNotFound(user_id));
    }

    let from_date = today - Duration::days(window_days);
    let details = LogEntry::get_details_since(&conn, user_id, from_date)?;
    let stats = adherence_stats(&details);

    Ok(AdherenceReport {
        user_id,
        window_days,
        from_date,
        days_with_data: stats.days_with_data,
        days_within_target: stats.days_within_target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;
    use crate::models::FoodItemCreate;
    use crate::services::diary::{log_consumption, LogConsumptionRequest};
    use crate::services::{catalog, targets};

    fn log_day(db: &Database, user_id: i64, food_id: i64, date: NaiveDate, grams: f64) {
        log_consumption(
            db,
            LogConsumptionRequest {
                user_id,
                date,
                food_item_id: Some(food_id),
                recipe_id: None,
                grams,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_window_filters_old_days() {
        let db = test_db();
        let user_id = targets::create_user(&db, "daniel", None).unwrap().id;
        // 1000 kcal per 100g, so grams map directly to kcal/10
        let food_id = catalog::add_food(
            &db,
            FoodItemCreate {
                name: "dense".to_string(),
                kcal_100g: 1000.0,
                protein_100g: 0.0,
                carbs_100g: 0.0,
                fat_100g: 0.0,
            },
        )
        .unwrap()
        .id;

        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();

        // In-window day exactly on target (2000 kcal = 200g)
        log_day(&db, user_id, food_id, today - Duration::days(2), 200.0);
        // In-window day far under target
        log_day(&db, user_id, food_id, today - Duration::days(5), 50.0);
        // Outside the 7-day window entirely
        log_day(&db, user_id, food_id, today - Duration::days(30), 200.0);

        let report = adherence_report_as_of(&db, user_id, 7, today).unwrap();
        assert_eq!(report.from_date, today - Duration::days(7));
        assert_eq!(report.days_with_data, 2);
        assert_eq!(report.days_within_target, 1);
    }

    #[test]
    fn test_report_uses_snapshot_targets_not_current() {
        let db = test_db();
        let user_id = targets::create_user(&db, "daniel", None).unwrap().id;
        let food_id = catalog::add_food(
            &db,
            FoodItemCreate {
                name: "dense".to_string(),
                kcal_100g: 1000.0,
                protein_100g: 0.0,
                carbs_100g: 0.0,
                fat_100g: 0.0,
            },
        )
        .unwrap()
        .id;

        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();

        // Logged while the target was 2000 kcal; 2000 kcal consumed
        log_day(&db, user_id, food_id, today - Duration::days(1), 200.0);

        // Target later drops far below what was eaten that day
        targets::update_targets(
            &db,
            user_id,
            crate::models::MacroTargets {
                kcal: 1000.0,
                ..Default::default()
            },
        )
        .unwrap();

        // The historical day is still judged against its snapshot
        let report = adherence_report_as_of(&db, user_id, 7, today).unwrap();
        assert_eq!(report.days_with_data, 1);
        assert_eq!(report.days_within_target, 1);
    }

    #[test]
    fn test_rejects_bad_window() {
        let db = test_db();
        let user_id = targets::create_user(&db, "daniel", None).unwrap().id;
        let err = adherence_report(&db, user_id, 0).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
