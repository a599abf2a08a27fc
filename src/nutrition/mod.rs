//! Nutrition calculation module
//!
//! The pure computation core: per-food and per-recipe macro calculation,
//! daily aggregation and adherence statistics. No I/O here; callers hand
//! in already-resolved model values.

pub mod adherence;
pub mod calculator;
pub mod summary;

pub use adherence::{adherence_stats, AdherenceStats, DEFAULT_TARGET_KCAL};
pub use calculator::{compute_entry_macros, compute_food_macros, compute_recipe_macros};
pub use summary::aggregate_day;
