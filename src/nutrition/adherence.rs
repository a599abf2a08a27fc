//! Adherence reporter
//!
//! Groups a lookback window's log entries by calendar date and counts how
//! many days landed within tolerance of that day's target.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::LogEntryDetail;

use super::calculator::compute_entry_macros;

/// Fallback target for days whose entries predate target snapshots
pub const DEFAULT_TARGET_KCAL: f64 = 2000.0;

/// Symmetric tolerance band around the day target
const TOLERANCE: f64 = 0.10;

/// Adherence rollup over a lookback window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdherenceStats {
    /// Distinct dates with at least one log entry
    pub days_with_data: u32,
    /// Of those, dates whose kcal total landed inside the tolerance band
    pub days_within_target: u32,
}

struct DayBucket {
    total_kcal: f64,
    target_kcal: Option<f64>,
}

/// Compute adherence statistics over an already-windowed entry collection.
///
/// Each date bucket's kcal total is summed at full precision; its target
/// is the first snapshot kcal found in input order, or the 2000 kcal
/// default when no entry in the bucket carries one. A day is within
/// target iff |total - target| <= 10% of target, inclusive on both
/// sides. Days with no entries appear in neither count.
pub fn adherence_stats(entries: &[LogEntryDetail]) -> AdherenceStats {
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for entry in entries {
        let bucket = buckets.entry(entry.date).or_insert(DayBucket {
            total_kcal: 0.0,
            target_kcal: None,
        });
        bucket.total_kcal += compute_entry_macros(entry).kcal;
        if bucket.target_kcal.is_none() {
            bucket.target_kcal = entry.target_snapshot.map(|t| t.kcal);
        }
    }

    let days_with_data = buckets.len() as u32;
    let days_within_target = buckets
        .values()
        .filter(|bucket| {
            let target = bucket.target_kcal.unwrap_or(DEFAULT_TARGET_KCAL);
            (bucket.total_kcal - target).abs() <= TOLERANCE * target
        })
        .count() as u32;

    AdherenceStats {
        days_with_data,
        days_within_target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConsumedSource, FoodItem, MacroTargets, Macros};

    fn entry(date: NaiveDate, kcal: f64, target_kcal: Option<f64>) -> LogEntryDetail {
        // 100g of a food whose density equals the desired kcal
        LogEntryDetail {
            id: 0,
            date,
            grams: 100.0,
            source: ConsumedSource::Food(FoodItem {
                id: 0,
                name: "test food".to_string(),
                per_100g: Macros {
                    kcal,
                    protein: 0.0,
                    carbs: 0.0,
                    fat: 0.0,
                },
                created_at: String::new(),
                updated_at: String::new(),
            }),
            target_snapshot: target_kcal.map(|kcal| MacroTargets {
                kcal,
                ..MacroTargets::default()
            }),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn test_empty_window() {
        let stats = adherence_stats(&[]);
        assert_eq!(stats.days_with_data, 0);
        assert_eq!(stats.days_within_target, 0);
    }

    #[test]
    fn test_tolerance_band_is_inclusive() {
        // Target 2000: exactly 2200 and exactly 1800 are both adherent
        let entries = vec![
            entry(date(1), 2200.0, Some(2000.0)),
            entry(date(2), 1800.0, Some(2000.0)),
        ];
        let stats = adherence_stats(&entries);
        assert_eq!(stats.days_with_data, 2);
        assert_eq!(stats.days_within_target, 2);
    }

    #[test]
    fn test_one_unit_beyond_band_is_not_adherent() {
        let entries = vec![
            entry(date(1), 2201.0, Some(2000.0)),
            entry(date(2), 1799.0, Some(2000.0)),
        ];
        let stats = adherence_stats(&entries);
        assert_eq!(stats.days_with_data, 2);
        assert_eq!(stats.days_within_target, 0);
    }

    #[test]
    fn test_entries_grouped_by_date() {
        // Two entries on the same day sum before the band check
        let entries = vec![
            entry(date(1), 1000.0, Some(2000.0)),
            entry(date(1), 950.0, Some(2000.0)),
            entry(date(3), 500.0, Some(2000.0)),
        ];
        let stats = adherence_stats(&entries);
        assert_eq!(stats.days_with_data, 2);
        assert_eq!(stats.days_within_target, 1);
    }

    #[test]
    fn test_snapshotless_day_uses_default_target() {
        let entries = vec![
            entry(date(1), 2000.0, None),
            entry(date(2), 1500.0, None),
        ];
        let stats = adherence_stats(&entries);
        assert_eq!(stats.days_with_data, 2);
        assert_eq!(stats.days_within_target, 1);
    }

    #[test]
    fn test_first_snapshot_in_day_wins() {
        // The bucket's target is the first snapshot seen in input order
        let entries = vec![
            entry(date(1), 1000.0, Some(1000.0)),
            entry(date(1), 50.0, Some(9999.0)),
        ];
        let stats = adherence_stats(&entries);
        // total 1050 against target 1000: within the 10% band
        assert_eq!(stats.days_within_target, 1);
    }

    #[test]
    fn test_silent_days_not_penalized() {
        // A single logged day in a long window: counts are 1/1, the quiet
        // days appear nowhere
        let entries = vec![entry(date(15), 2000.0, Some(2000.0))];
        let stats = adherence_stats(&entries);
        assert_eq!(stats.days_with_data, 1);
        assert_eq!(stats.days_within_target, 1);
    }
}
