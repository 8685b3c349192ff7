//! Recipe API client

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[cfg(test)]
pub mod mock;
pub mod rate_limit;
pub mod spoonacular;

#[cfg(test)]
pub use mock::MockRecipeClient;
pub use spoonacular::SpoonacularClient;

/// Recipe API trait.
///
/// Each operation returns the raw response body; decoding into domain types
/// is left to the caller.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Full recipe information (without nutrition)
    async fn recipe_details(&self, recipe_id: u64) -> Result<String>;

    /// Ingredient widget for a recipe
    async fn ingredients(&self, recipe_id: u64) -> Result<String>;

    /// Recipes that use the given ingredients
    async fn recipes_by_ingredients(&self, ingredients: &IngredientList) -> Result<String>;

    /// Recipes matching diet, intolerance and calorie filters
    async fn filtered_recipes(&self, filters: &RecipeFilters) -> Result<String>;
}

/// Normalized, comma-separated ingredient list.
///
/// Whitespace around items and empty items are dropped, so `"apple, flour"`
/// and `" apple ,flour ,"` are the same list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IngredientList(Vec<String>);

impl IngredientList {
    #[cfg(test)]
    pub fn items(&self) -> &[String] {
        &self.0
    }
}

impl FromStr for IngredientList {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let items: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();

        if items.is_empty() {
            return Err("at least one ingredient is required".to_string());
        }
        Ok(Self(items))
    }
}

impl fmt::Display for IngredientList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Filters for complex recipe search
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeFilters {
    /// Diet name (e.g. "vegetarian", "vegan")
    pub diet: String,

    /// Comma-separated intolerances (e.g. "gluten,dairy")
    pub intolerance: String,

    pub min_calories: u32,

    pub max_calories: u32,
}
