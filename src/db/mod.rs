//! Database module
//!
//! Handles SQLite connection and migrations.

pub mod connection;
pub mod migrations;

#[cfg(test)]
pub mod test_utils;

pub use connection::{Database, DbError, DbResult};
