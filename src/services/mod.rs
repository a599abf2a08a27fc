//! Service layer
//!
//! Validated operations over the database: catalog management, the
//! consumption diary, target edits and adherence reports. This is the
//! call boundary a web layer would consume; responses are plain
//! serializable structs.

use thiserror::Error;

use crate::db::DbError;

pub mod catalog;
pub mod diary;
pub mod reports;
pub mod targets;

/// Service error types
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not found with id: {0}")]
    UserNotFound(i64),

    #[error("Food item not found with id: {0}")]
    FoodNotFound(i64),

    #[error("Recipe not found with id: {0}")]
    RecipeNotFound(i64),

    #[error("Log entry not found with id: {0}")]
    EntryNotFound(i64),

    #[error("Cannot delete food item: used by {recipe_count} recipe ingredient(s) and {log_count} log entry(ies)")]
    FoodInUse { recipe_count: i64, log_count: i64 },

    #[error("Cannot delete recipe: referenced by {log_count} log entry(ies)")]
    RecipeInUse { log_count: i64 },
}

impl From<rusqlite::Error> for ServiceError {
    fn from(e: rusqlite::Error) -> Self {
        ServiceError::Db(DbError::Sqlite(e))
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Reject non-finite or negative macro-style values
fn validate_non_negative(value: f64, field: &str) -> ServiceResult<()> {
    if !value.is_finite() {
        return Err(ServiceError::InvalidInput(format!(
            "{} must be a finite number",
            field
        )));
    }
    if value < 0.0 {
        return Err(ServiceError::InvalidInput(format!(
            "{} cannot be negative",
            field
        )));
    }
    Ok(())
}

/// Reject gram quantities that are not strictly positive finite numbers
fn validate_grams(value: f64, field: &str) -> ServiceResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ServiceError::InvalidInput(format!(
            "{} must be a positive number of grams",
            field
        )));
    }
    Ok(())
}
