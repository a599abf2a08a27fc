//! Catalog service
//!
//! Food and recipe management. Recipe creation is atomic with its
//! ingredients; ingredient edits replace the whole set; deletions are
//! blocked with a friendly error while anything still references the row.

use serde::Serialize;

use crate::db::{Database, DbError};
use crate::models::{
    FoodItem, FoodItemCreate, FoodItemUpdate, IngredientSpec, Macros, Recipe, RecipeDetail,
    RecipeIngredient,
};
use crate::nutrition::compute_recipe_macros;

use super::{validate_grams, validate_non_negative, ServiceError, ServiceResult};

/// Response for add_food
#[derive(Debug, Serialize)]
pub struct AddFoodResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// Summary of a food item for list results
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub id: i64,
    pub name: String,
    pub per_100g: Macros,
}

impl From<&FoodItem> for FoodSummary {
    fn from(item: &FoodItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            per_100g: item.per_100g,
        }
    }
}

/// Full food item detail with usage information
#[derive(Debug, Serialize)]
pub struct FoodDetail {
    pub id: i64,
    pub name: String,
    pub per_100g: Macros,
    pub recipe_usage_count: i64,
    pub log_usage_count: i64,
    pub used_in_recipes: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Response for list_foods
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub items: Vec<FoodSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for update_food
#[derive(Debug, Serialize)]
pub struct UpdateFoodResponse {
    pub success: bool,
    pub updated_at: String,
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// One ingredient line in a recipe response
#[derive(Debug, Serialize)]
pub struct RecipeIngredientLine {
    pub food_item_id: i64,
    pub food_name: Option<String>,
    pub grams: f64,
}

/// Recipe with derived totals
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<RecipeIngredientLine>,
    /// Sum of ingredient grams; never stored, derived on read
    pub total_weight: f64,
    /// Macros for eating the entire batch
    pub batch_macros: Macros,
}

impl RecipeResponse {
    fn from_detail(detail: &RecipeDetail) -> Self {
        let total_weight = detail.total_weight();
        let batch_macros = compute_recipe_macros(total_weight, Some(detail));
        Self {
            id: detail.id,
            name: detail.name.clone(),
            ingredients: detail
                .ingredients
                .iter()
                .map(|ing| RecipeIngredientLine {
                    food_item_id: ing.food_item_id,
                    food_name: ing.food.as_ref().map(|f| f.name.clone()),
                    grams: ing.grams,
                })
                .collect(),
            total_weight,
            batch_macros,
        }
    }
}

/// Summary of a recipe for list results
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub items: Vec<RecipeSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

fn validate_food_create(data: &FoodItemCreate) -> ServiceResult<()> {
    if data.name.trim().is_empty() {
        return Err(ServiceError::InvalidInput(
            "food name cannot be empty".to_string(),
        ));
    }
    validate_non_negative(data.kcal_100g, "kcal_100g")?;
    validate_non_negative(data.protein_100g, "protein_100g")?;
    validate_non_negative(data.carbs_100g, "carbs_100g")?;
    validate_non_negative(data.fat_100g, "fat_100g")?;
    Ok(())
}

fn validate_ingredients(conn: &rusqlite::Connection, specs: &[IngredientSpec]) -> ServiceResult<()> {
    for spec in specs {
        validate_grams(spec.grams, "ingredient grams")?;
        if FoodItem::get_by_id(conn, spec.food_item_id)
            .map_err(ServiceError::Db)?
            .is_none()
        {
            return Err(ServiceError::FoodNotFound(spec.food_item_id));
        }
    }
    Ok(())
}

/// Register a new food item
pub fn add_food(db: &Database, data: FoodItemCreate) -> ServiceResult<AddFoodResponse> {
    validate_food_create(&data)?;

    let conn = db.get_conn()?;
    let item = FoodItem::create(&conn, &data)?;

    tracing::info!(food_id = item.id, name = %item.name, "food item created");

    Ok(AddFoodResponse {
        id: item.id,
        name: item.name,
        created_at: item.created_at,
    })
}

/// Get a food item with usage information
pub fn get_food(db: &Database, id: i64) -> ServiceResult<FoodDetail> {
    let conn = db.get_conn()?;

    let item = FoodItem::get_by_id(&conn, id)?.ok_or(ServiceError::FoodNotFound(id))?;
    let recipe_usage_count = FoodItem::get_recipe_usage_count(&conn, id)?;
    let log_usage_count = FoodItem::get_log_usage_count(&conn, id)?;
    let used_in_recipes = FoodItem::get_used_in_recipes(&conn, id)?;

    Ok(FoodDetail {
        id: item.id,
        name: item.name,
        per_100g: item.per_100g,
        recipe_usage_count,
        log_usage_count,
        used_in_recipes,
        created_at: item.created_at,
        updated_at: item.updated_at,
    })
}

/// List food items with pagination
pub fn list_foods(db: &Database, limit: i64, offset: i64) -> ServiceResult<ListFoodsResponse> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn()?;
    let items = FoodItem::list(&conn, limit, offset)?;
    let total = FoodItem::count(&conn)?;

    Ok(ListFoodsResponse {
        items: items.iter().map(FoodSummary::from).collect(),
        total,
        limit,
        offset,
    })
}

/// Search food items by name
pub fn search_foods(db: &Database, query: &str, limit: i64) -> ServiceResult<Vec<FoodSummary>> {
    let limit = limit.clamp(1, 100);
    let conn = db.get_conn()?;
    let items = FoodItem::search(&conn, query, limit)?;
    Ok(items.iter().map(FoodSummary::from).collect())
}

/// Update a food item's name or density.
///
/// Produces a new effective density for future calculations; historical
/// log rows are never rewritten.
pub fn update_food(db: &Database, id: i64, data: FoodItemUpdate) -> ServiceResult<UpdateFoodResponse> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "food name cannot be empty".to_string(),
            ));
        }
    }
    if let Some(v) = data.kcal_100g {
        validate_non_negative(v, "kcal_100g")?;
    }
    if let Some(v) = data.protein_100g {
        validate_non_negative(v, "protein_100g")?;
    }
    if let Some(v) = data.carbs_100g {
        validate_non_negative(v, "carbs_100g")?;
    }
    if let Some(v) = data.fat_100g {
        validate_non_negative(v, "fat_100g")?;
    }

    let conn = db.get_conn()?;
    let updated = FoodItem::update(&conn, id, &data)?.ok_or(ServiceError::FoodNotFound(id))?;

    Ok(UpdateFoodResponse {
        success: true,
        updated_at: updated.updated_at,
    })
}

/// Delete a food item, blocked while any recipe ingredient or log entry
/// references it
pub fn delete_food(db: &Database, id: i64) -> ServiceResult<DeleteResponse> {
    let conn = db.get_conn()?;

    if FoodItem::get_by_id(&conn, id)?.is_none() {
        return Err(ServiceError::FoodNotFound(id));
    }

    let recipe_count = FoodItem::get_recipe_usage_count(&conn, id)?;
    let log_count = FoodItem::get_log_usage_count(&conn, id)?;
    if recipe_count > 0 || log_count > 0 {
        return Err(ServiceError::FoodInUse {
            recipe_count,
            log_count,
        });
    }

    FoodItem::delete(&conn, id)?;
    tracing::info!(food_id = id, "food item deleted");

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

/// Create a recipe together with its ingredients, atomically
pub fn create_recipe(
    db: &Database,
    name: &str,
    ingredients: Vec<IngredientSpec>,
) -> ServiceResult<RecipeResponse> {
    if name.trim().is_empty() {
        return Err(ServiceError::InvalidInput(
            "recipe name cannot be empty".to_string(),
        ));
    }

    let mut conn = db.get_conn()?;
    let tx = conn.transaction().map_err(DbError::Sqlite)?;

    validate_ingredients(&tx, &ingredients)?;

    let recipe = Recipe::create(&tx, name)?;
    for spec in &ingredients {
        RecipeIngredient::insert(&tx, recipe.id, spec)?;
    }

    let detail = Recipe::get_detail(&tx, recipe.id)?.ok_or(ServiceError::RecipeNotFound(recipe.id))?;
    let response = RecipeResponse::from_detail(&detail);

    tx.commit().map_err(DbError::Sqlite)?;

    tracing::info!(recipe_id = recipe.id, name = %name, "recipe created");

    Ok(response)
}

/// Get a recipe with its derived weight and batch macros
pub fn get_recipe(db: &Database, id: i64) -> ServiceResult<RecipeResponse> {
    let conn = db.get_conn()?;
    let detail = Recipe::get_detail(&conn, id)?.ok_or(ServiceError::RecipeNotFound(id))?;
    Ok(RecipeResponse::from_detail(&detail))
}

/// List recipes with pagination
pub fn list_recipes(db: &Database, limit: i64, offset: i64) -> ServiceResult<ListRecipesResponse> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn()?;
    let recipes = Recipe::list(&conn, limit, offset)?;
    let total = Recipe::count(&conn)?;

    Ok(ListRecipesResponse {
        items: recipes
            .iter()
            .map(|r| RecipeSummary {
                id: r.id,
                name: r.name.clone(),
            })
            .collect(),
        total,
        limit,
        offset,
    })
}

/// Update a recipe: optional rename, optional wholesale ingredient
/// replacement. Both run in one transaction.
pub fn update_recipe(
    db: &Database,
    id: i64,
    name: Option<&str>,
    ingredients: Option<Vec<IngredientSpec>>,
) -> ServiceResult<RecipeResponse> {
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "recipe name cannot be empty".to_string(),
            ));
        }
    }

    let mut conn = db.get_conn()?;
    let tx = conn.transaction().map_err(DbError::Sqlite)?;

    if Recipe::get_by_id(&tx, id)?.is_none() {
        return Err(ServiceError::RecipeNotFound(id));
    }

    if let Some(name) = name {
        Recipe::rename(&tx, id, name)?;
    }

    if let Some(specs) = ingredients {
        validate_ingredients(&tx, &specs)?;
        RecipeIngredient::replace_for_recipe(&tx, id, &specs)?;
    }

    let detail = Recipe::get_detail(&tx, id)?.ok_or(ServiceError::RecipeNotFound(id))?;
    let response = RecipeResponse::from_detail(&detail);

    tx.commit().map_err(DbError::Sqlite)?;

    Ok(response)
}

/// Delete a recipe. Its ingredient rows cascade away; deletion is blocked
/// while log entries reference it.
pub fn delete_recipe(db: &Database, id: i64) -> ServiceResult<DeleteResponse> {
    let conn = db.get_conn()?;

    if Recipe::get_by_id(&conn, id)?.is_none() {
        return Err(ServiceError::RecipeNotFound(id));
    }

    let log_count = Recipe::get_log_usage_count(&conn, id)?;
    if log_count > 0 {
        return Err(ServiceError::RecipeInUse { log_count });
    }

    Recipe::delete(&conn, id)?;
    tracing::info!(recipe_id = id, "recipe deleted");

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}
