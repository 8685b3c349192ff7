//! Mock recipe API client for testing
//!
//! Provides a mock implementation of [`RecipeApi`] for unit testing
//! without making real API calls.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::{IngredientList, RecipeApi, RecipeFilters};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockRecipeClient::new()
///     .with_latency(Duration::from_millis(100))
///     .await;
///
/// let body = mock.recipe_details(42).await?;
/// assert_eq!(body, r#"{"id":42}"#);
/// ```
#[derive(Default)]
pub struct MockRecipeClient {
    /// Body to return instead of the generated default
    body: Arc<Mutex<Option<String>>>,
    /// Simulated network latency
    latency: Arc<Mutex<Option<Duration>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub recipe_details: usize,
    pub ingredients: usize,
    pub recipes_by_ingredients: usize,
    pub filtered_recipes: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.recipe_details + self.ingredients + self.recipes_by_ingredients + self.filtered_recipes
    }
}

impl MockRecipeClient {
    /// Create a new mock client with generated responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure a fixed body for every successful call.
    pub async fn with_body(self, body: impl Into<String>) -> Self {
        *self.body.lock().await = Some(body.into());
        self
    }

    /// Delay every call by `latency` before answering.
    pub async fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().await = Some(latency);
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Simulate the round trip: latency, then the pending error or a body.
    async fn respond(&self, default_body: String) -> Result<String> {
        let latency = *self.latency.lock().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(e) = self.error.lock().await.take() {
            return Err(e.into());
        }

        let body = self.body.lock().await.clone();
        Ok(body.unwrap_or(default_body))
    }
}

#[async_trait]
impl RecipeApi for MockRecipeClient {
    async fn recipe_details(&self, recipe_id: u64) -> Result<String> {
        self.call_count.lock().await.recipe_details += 1;
        self.respond(format!(r#"{{"id":{}}}"#, recipe_id)).await
    }

    async fn ingredients(&self, recipe_id: u64) -> Result<String> {
        self.call_count.lock().await.ingredients += 1;
        self.respond(format!(r#"{{"recipeId":{},"ingredients":[]}}"#, recipe_id))
            .await
    }

    async fn recipes_by_ingredients(&self, ingredients: &IngredientList) -> Result<String> {
        self.call_count.lock().await.recipes_by_ingredients += 1;
        self.respond(format!(r#"[{{"usedIngredients":"{}"}}]"#, ingredients))
            .await
    }

    async fn filtered_recipes(&self, filters: &RecipeFilters) -> Result<String> {
        self.call_count.lock().await.filtered_recipes += 1;
        self.respond(format!(r#"{{"diet":"{}","results":[]}}"#, filters.diet))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_mock_client_default_bodies() {
        let mock = MockRecipeClient::new();

        assert_eq!(mock.recipe_details(42).await.unwrap(), r#"{"id":42}"#);
        let list: IngredientList = "apple,flour".parse().unwrap();
        assert!(
            mock.recipes_by_ingredients(&list)
                .await
                .unwrap()
                .contains("apple,flour")
        );
    }

    #[tokio::test]
    async fn test_mock_client_with_body() {
        let mock = MockRecipeClient::new().with_body("{}").await;
        assert_eq!(mock.ingredients(1).await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_mock_client_with_error() {
        let mock = MockRecipeClient::new()
            .with_error(ApiError::Unauthorized)
            .await;

        let result = mock.recipe_details(1).await;
        assert!(matches!(result, Err(Error::Api(ApiError::Unauthorized))));

        // Error is consumed, next call succeeds
        assert!(mock.recipe_details(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_client_call_counts() {
        let mock = MockRecipeClient::new();

        let _ = mock.recipe_details(1).await;
        let _ = mock.recipe_details(2).await;
        let _ = mock.ingredients(1).await;

        let counts = mock.call_counts().await;
        assert_eq!(counts.recipe_details, 2);
        assert_eq!(counts.ingredients, 1);
        assert_eq!(counts.total(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_client_latency() {
        let mock = MockRecipeClient::new()
            .with_latency(Duration::from_secs(5))
            .await;

        let start = tokio::time::Instant::now();
        mock.recipe_details(1).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
