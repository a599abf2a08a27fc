//! Targets service
//!
//! User creation and edits to the current macro targets. Edits here only
//! affect future log entries and snapshot-less fallbacks; history keeps
//! the snapshots it was written with.

use serde::Serialize;

use crate::db::Database;
use crate::models::{MacroTargets, User};

use super::{validate_non_negative, ServiceError, ServiceResult};

/// Response for create_user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub targets: MacroTargets,
    pub created_at: String,
}

/// Response for get_targets / update_targets
#[derive(Debug, Serialize)]
pub struct TargetsResponse {
    pub user_id: i64,
    pub targets: MacroTargets,
    pub updated_at: String,
}

fn validate_targets(targets: &MacroTargets) -> ServiceResult<()> {
    validate_non_negative(targets.kcal, "target kcal")?;
    validate_non_negative(targets.protein, "target protein")?;
    validate_non_negative(targets.carbs, "target carbs")?;
    validate_non_negative(targets.fat, "target fat")?;
    Ok(())
}

/// Create a user, with the stock targets unless given explicit ones
pub fn create_user(
    db: &Database,
    name: &str,
    targets: Option<MacroTargets>,
) -> ServiceResult<UserResponse> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "user name cannot be empty".to_string(),
        ));
    }

    let targets = targets.unwrap_or_default();
    validate_targets(&targets)?;

    let conn = db.get_conn()?;
    let user = User::create(&conn, name, &targets)?;

    tracing::info!(user_id = user.id, name = %user.name, "user created");

    Ok(UserResponse {
        id: user.id,
        name: user.name,
        targets: user.targets,
        created_at: user.created_at,
    })
}

/// Get a user's current targets
pub fn get_targets(db: &Database, user_id: i64) -> ServiceResult<TargetsResponse> {
    let conn = db.get_conn()?;
    let user = User::get_by_id(&conn, user_id)?.ok_or(ServiceError::UserNotFound(user_id))?;

    Ok(TargetsResponse {
        user_id: user.id,
        targets: user.targets,
        updated_at: user.updated_at,
    })
}

/// Replace a user's current targets
pub fn update_targets(
    db: &Database,
    user_id: i64,
    targets: MacroTargets,
) -> ServiceResult<TargetsResponse> {
    validate_targets(&targets)?;

    let conn = db.get_conn()?;
    let user =
        User::update_targets(&conn, user_id, &targets)?.ok_or(ServiceError::UserNotFound(user_id))?;

    tracing::info!(user_id, "targets updated");

    Ok(TargetsResponse {
        user_id: user.id,
        targets: user.targets,
        updated_at: user.updated_at,
    })
}
