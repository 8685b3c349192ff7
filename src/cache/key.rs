//! Cache key formulas for the recipe operations
//!
//! Keys are plain strings: operation name followed by the argument values.
//! Arguments are normalized by their types before they get here, so two
//! logically identical requests always map to the same key.

use crate::client::{IngredientList, RecipeFilters};

pub fn recipe_details(recipe_id: u64) -> String {
    format!("recipeDetails_{}", recipe_id)
}

pub fn ingredients(recipe_id: u64) -> String {
    format!("ingredients_{}", recipe_id)
}

pub fn recipes(ingredients: &IngredientList) -> String {
    format!("recipes_{}", ingredients)
}

/// Free-text fields have `\\` and `_` escaped so they cannot shift across
/// the separators.
pub fn filtered_recipes(filters: &RecipeFilters) -> String {
    format!(
        "filteredRecipes_{}_{}_{}_{}",
        escape(&filters.diet),
        escape(&filters.intolerance),
        filters.min_calories,
        filters.max_calories
    )
}

fn escape(field: &str) -> String {
    field.replace('\\', "\\\\").replace('_', "\\_")
}
