//! Daily aggregator
//!
//! Folds one user-day's log entries into a single macro total.

use crate::models::{LogEntryDetail, Macros};

use super::calculator::compute_entry_macros;

/// Total macros for one user-day's entries.
///
/// Summation runs at full precision in input order; the one-decimal
/// rounding is applied exactly once, to the final total, so many small
/// fractional entries cannot compound per-entry rounding error. Entries
/// with no resolvable source contribute zero. An empty day totals zero.
pub fn aggregate_day(entries: &[LogEntryDetail]) -> Macros {
    entries
        .iter()
        .map(compute_entry_macros)
        .sum::<Macros>()
        .rounded()
}
