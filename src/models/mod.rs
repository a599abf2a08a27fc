//! Data models
//!
//! Rust structs representing database entities, plus the resolved views
//! the nutrition engine consumes.

mod food_item;
mod log_entry;
mod macros;
mod recipe;
mod recipe_ingredient;
mod user;

pub use food_item::{FoodItem, FoodItemCreate, FoodItemUpdate};
pub use log_entry::{
    ConsumedSource, LogEntry, LogEntryCreate, LogEntryDetail,
};
pub use macros::{MacroTargets, Macros};
pub use recipe::{Recipe, RecipeDetail};
pub use recipe_ingredient::{IngredientDetail, IngredientSpec, RecipeIngredient};
pub use user::User;
