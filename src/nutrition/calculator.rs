//! Macro calculator
//!
//! Converts a gram quantity of a single food, or a consumed quantity of a
//! recipe, into absolute macro values. Grams are assumed validated
//! non-negative upstream; missing references yield zero macros rather than
//! errors, since a food or recipe may be deleted out from under a log row
//! by the surrounding CRUD layer.

use crate::models::{ConsumedSource, FoodItem, LogEntryDetail, Macros, RecipeDetail};

/// Macros for `grams` of a food, from its per-100g density.
///
/// No rounding happens here; rounding is a presentation concern applied
/// once at the day-total boundary.
pub fn compute_food_macros(grams: f64, food: Option<&FoodItem>) -> Macros {
    match food {
        Some(food) => food.per_100g.scale(grams / 100.0),
        None => Macros::zero(),
    }
}

/// Macros for `grams_consumed` of a recipe.
///
/// The whole batch is summed first (each ingredient at its own gram
/// quantity), then scaled by consumed/total weight, so eating 250 g of a
/// 500 g batch yields exactly half of every ingredient's contribution.
/// An absent or ingredient-less recipe yields zero, as does a zero total
/// weight (no division by zero).
pub fn compute_recipe_macros(grams_consumed: f64, recipe: Option<&RecipeDetail>) -> Macros {
    let recipe = match recipe {
        Some(recipe) if !recipe.ingredients.is_empty() => recipe,
        _ => return Macros::zero(),
    };

    let total_weight = recipe.total_weight();

    let batch_total: Macros = recipe
        .ingredients
        .iter()
        .map(|ing| compute_food_macros(ing.grams, ing.food.as_ref()))
        .sum();

    let consumption_ratio = if total_weight > 0.0 {
        grams_consumed / total_weight
    } else {
        0.0
    };

    batch_total.scale(consumption_ratio)
}

/// Macros for one resolved log entry.
///
/// The shared dispatch used by both the daily aggregator and the adherence
/// reporter. An unresolved source contributes zero and is never an error,
/// so one dangling reference cannot fail a whole day's summary.
pub fn compute_entry_macros(entry: &LogEntryDetail) -> Macros {
    match &entry.source {
        ConsumedSource::Food(food) => compute_food_macros(entry.grams, Some(food)),
        ConsumedSource::Recipe(recipe) => compute_recipe_macros(entry.grams, Some(recipe)),
        ConsumedSource::Unresolved => {
            tracing::debug!(entry_id = entry.id, "log entry has no resolvable source, counting zero");
            Macros::zero()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IngredientDetail;
    use chrono::NaiveDate;

    fn food(kcal: f64, protein: f64, carbs: f64, fat: f64) -> FoodItem {
        FoodItem {
            id: 1,
            name: "test food".to_string(),
            per_100g: Macros {
                kcal,
                protein,
                carbs,
                fat,
            },
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn ingredient(food_item: FoodItem, grams: f64) -> IngredientDetail {
        IngredientDetail {
            id: 0,
            food_item_id: food_item.id,
            grams,
            food: Some(food_item),
        }
    }

    #[test]
    fn test_food_macros_proportional() {
        // 150g of a 100kcal/20p/0c/2f food is 1.5x the per-100g values
        let f = food(100.0, 20.0, 0.0, 2.0);
        let m = compute_food_macros(150.0, Some(&f));
        assert_eq!(m.kcal, 150.0);
        assert_eq!(m.protein, 30.0);
        assert_eq!(m.carbs, 0.0);
        assert_eq!(m.fat, 3.0);
    }

    #[test]
    fn test_food_macros_zero_grams() {
        let f = food(250.0, 10.0, 30.0, 8.0);
        let m = compute_food_macros(0.0, Some(&f));
        assert_eq!(m.kcal, 0.0);
        assert_eq!(m.protein, 0.0);
    }

    #[test]
    fn test_food_macros_missing_food_is_zero() {
        let m = compute_food_macros(150.0, None);
        assert_eq!(m.kcal, 0.0);
        assert_eq!(m.protein, 0.0);
        assert_eq!(m.carbs, 0.0);
        assert_eq!(m.fat, 0.0);
    }

    #[test]
    fn test_recipe_macros_scaled_by_consumed_fraction() {
        // 200g recipe totalling 300kcal/10p/10c; eating 100g gives half
        let recipe = RecipeDetail {
            id: 1,
            name: "mix".to_string(),
            ingredients: vec![
                ingredient(food(100.0, 10.0, 0.0, 0.0), 100.0),
                ingredient(food(200.0, 0.0, 10.0, 0.0), 100.0),
            ],
        };

        let m = compute_recipe_macros(100.0, Some(&recipe));
        assert_eq!(m.kcal, 150.0);
        assert_eq!(m.protein, 5.0);
        assert_eq!(m.carbs, 5.0);
        assert_eq!(m.fat, 0.0);
    }

    #[test]
    fn test_recipe_macros_whole_batch() {
        let recipe = RecipeDetail {
            id: 1,
            name: "shake".to_string(),
            ingredients: vec![
                ingredient(food(600.0, 25.0, 20.0, 50.0), 30.0),
                ingredient(food(64.0, 3.4, 4.8, 3.6), 250.0),
            ],
        };

        let whole = compute_recipe_macros(280.0, Some(&recipe));
        let batch: Macros = recipe
            .ingredients
            .iter()
            .map(|i| compute_food_macros(i.grams, i.food.as_ref()))
            .sum();
        assert!((whole.kcal - batch.kcal).abs() < 1e-9);
        assert!((whole.protein - batch.protein).abs() < 1e-9);
    }

    #[test]
    fn test_recipe_macros_empty_recipe_guard() {
        let recipe = RecipeDetail {
            id: 1,
            name: "empty".to_string(),
            ingredients: vec![],
        };

        // Any consumed quantity of an empty recipe is zero, no division error
        let m = compute_recipe_macros(250.0, Some(&recipe));
        assert_eq!(m.kcal, 0.0);
        assert_eq!(m.fat, 0.0);

        let m = compute_recipe_macros(250.0, None);
        assert_eq!(m.kcal, 0.0);
    }

    #[test]
    fn test_recipe_macros_dangling_ingredient_contributes_zero() {
        let recipe = RecipeDetail {
            id: 1,
            name: "partial".to_string(),
            ingredients: vec![
                ingredient(food(100.0, 10.0, 0.0, 0.0), 100.0),
                IngredientDetail {
                    id: 2,
                    food_item_id: 99,
                    grams: 100.0,
                    food: None,
                },
            ],
        };

        // Weight still counts both ingredients; macros only the resolved one
        let m = compute_recipe_macros(200.0, Some(&recipe));
        assert_eq!(m.kcal, 100.0);
        assert_eq!(m.protein, 10.0);
    }

    #[test]
    fn test_entry_macros_unresolved_is_zero() {
        let entry = LogEntryDetail {
            id: 1,
            date: NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
            grams: 150.0,
            source: ConsumedSource::Unresolved,
            target_snapshot: None,
        };

        let m = compute_entry_macros(&entry);
        assert_eq!(m.kcal, 0.0);
        assert_eq!(m.protein, 0.0);
        assert_eq!(m.carbs, 0.0);
        assert_eq!(m.fat, 0.0);
    }

    #[test]
    fn test_entry_macros_dispatch() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();

        let food_entry = LogEntryDetail {
            id: 1,
            date,
            grams: 200.0,
            source: ConsumedSource::Food(food(100.0, 20.0, 0.0, 2.0)),
            target_snapshot: None,
        };
        assert_eq!(compute_entry_macros(&food_entry).kcal, 200.0);
        assert_eq!(compute_entry_macros(&food_entry).protein, 40.0);

        let recipe_entry = LogEntryDetail {
            id: 2,
            date,
            grams: 100.0,
            source: ConsumedSource::Recipe(RecipeDetail {
                id: 1,
                name: "mix".to_string(),
                ingredients: vec![
                    ingredient(food(100.0, 10.0, 0.0, 0.0), 100.0),
                    ingredient(food(200.0, 0.0, 10.0, 0.0), 100.0),
                ],
            }),
            target_snapshot: None,
        };
        assert_eq!(compute_entry_macros(&recipe_entry).kcal, 150.0);
    }
}
