//! Nutrilog Library
//!
//! Core functionality for a personal nutrition diary: food and recipe
//! catalog, daily consumption log with target snapshots, macro
//! aggregation and adherence statistics.

pub mod db;
pub mod models;
pub mod nutrition;
pub mod services;
