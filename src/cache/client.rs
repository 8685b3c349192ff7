//! Cached wrapper for the recipe API client
//!
//! Every operation goes through the [`RequestCoordinator`], so concurrent
//! identical calls share one network request and fresh responses are served
//! from memory.

use std::future::Future;
use std::sync::Arc;

use log::warn;

use super::coordinator::RequestCoordinator;
use super::key;
use super::storage::CacheStore;
use crate::client::{IngredientList, RecipeApi, RecipeFilters};
use crate::config::CacheSettings;
use crate::error::Result;

/// Cached wrapper for any RecipeApi implementation.
///
/// Failed calls resolve to `None` for every caller sharing them and are never
/// cached. Cache can be disabled via the `enabled` flag (for `--no-cache`);
/// concurrent identical calls are still coalesced.
pub struct CachedRecipeClient<C: RecipeApi> {
    inner: Arc<C>,
    coordinator: RequestCoordinator,
}

impl<C: RecipeApi> CachedRecipeClient<C> {
    /// Create a new cached client wrapper.
    ///
    /// # Arguments
    /// * `inner` - The underlying API client to wrap
    /// * `settings` - Expiration and wait timeout
    /// * `enabled` - Whether caching is enabled (false for --no-cache)
    pub fn new(inner: C, settings: &CacheSettings, enabled: bool) -> Self {
        let store = if enabled {
            CacheStore::new(settings.expiration())
        } else {
            CacheStore::disabled()
        };

        Self {
            inner: Arc::new(inner),
            coordinator: RequestCoordinator::new(store, settings.wait_timeout()),
        }
    }

    /// Get the inner client
    #[cfg(test)]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn coordinator(&self) -> &RequestCoordinator {
        &self.coordinator
    }

    pub async fn recipe_details(&self, recipe_id: u64) -> Option<String> {
        let key = key::recipe_details(recipe_id);
        self.coordinator
            .fetch_or_join(&key, || absorb(&key, self.inner.recipe_details(recipe_id)))
            .await
    }

    pub async fn ingredients(&self, recipe_id: u64) -> Option<String> {
        let key = key::ingredients(recipe_id);
        self.coordinator
            .fetch_or_join(&key, || absorb(&key, self.inner.ingredients(recipe_id)))
            .await
    }

    pub async fn recipes_by_ingredients(&self, ingredients: &IngredientList) -> Option<String> {
        let key = key::recipes(ingredients);
        self.coordinator
            .fetch_or_join(&key, || {
                absorb(&key, self.inner.recipes_by_ingredients(ingredients))
            })
            .await
    }

    pub async fn filtered_recipes(&self, filters: &RecipeFilters) -> Option<String> {
        let key = key::filtered_recipes(filters);
        self.coordinator
            .fetch_or_join(&key, || absorb(&key, self.inner.filtered_recipes(filters)))
            .await
    }
}

/// Turn a failed API call into an absent result, logging the cause
async fn absorb<F>(key: &str, call: F) -> Option<String>
where
    F: Future<Output = Result<String>>,
{
    match call.await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!("Request for {} failed: {}", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockRecipeClient;
    use crate::error::ApiError;
    use std::time::Duration;

    fn cached(mock: MockRecipeClient) -> Arc<CachedRecipeClient<MockRecipeClient>> {
        Arc::new(CachedRecipeClient::new(
            mock,
            &CacheSettings::default(),
            true,
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_calls_share_one_request() {
        let mock = MockRecipeClient::new()
            .with_latency(Duration::from_millis(100))
            .await;
        let client = cached(mock);

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let client = Arc::clone(&client);
                tokio::spawn(async move { client.recipe_details(42).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().as_deref(), Some(r#"{"id":42}"#));
        }

        assert_eq!(client.inner().call_counts().await.recipe_details, 1);
        let stats = client.coordinator().stats();
        assert_eq!(stats.fetches, 1);
        assert_eq!(stats.joins, 2);
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let client = cached(MockRecipeClient::new());

        assert!(client.ingredients(7).await.is_some());
        assert!(client.ingredients(7).await.is_some());

        assert_eq!(client.inner().call_counts().await.ingredients, 1);
        assert_eq!(client.coordinator().stats().hits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_reaches_every_caller_and_is_not_cached() {
        let mock = MockRecipeClient::new()
            .with_latency(Duration::from_millis(100))
            .await
            .with_error(ApiError::ServerError("boom".to_string()))
            .await;
        let client = cached(mock);

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let client = Arc::clone(&client);
                tokio::spawn(async move { client.recipe_details(1).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), None);
        }
        assert_eq!(client.inner().call_counts().await.recipe_details, 1);

        // Error was consumed; a retry goes back to the network and succeeds
        assert!(client.recipe_details(1).await.is_some());
        assert_eq!(client.inner().call_counts().await.recipe_details, 2);
    }

    #[tokio::test]
    async fn test_disabled_cache_always_fetches() {
        let client = CachedRecipeClient::new(
            MockRecipeClient::new(),
            &CacheSettings::default(),
            false,
        );

        let filters = RecipeFilters {
            diet: "vegan".to_string(),
            intolerance: String::new(),
            min_calories: 0,
            max_calories: 800,
        };
        assert!(client.filtered_recipes(&filters).await.is_some());
        assert!(client.filtered_recipes(&filters).await.is_some());

        assert_eq!(client.inner().call_counts().await.filtered_recipes, 2);
    }

    #[tokio::test]
    async fn test_equivalent_ingredient_lists_share_cache_entry() {
        let client = cached(MockRecipeClient::new());

        let a: IngredientList = "apple, flour".parse().unwrap();
        let b: IngredientList = "apple,flour,".parse().unwrap();
        assert!(client.recipes_by_ingredients(&a).await.is_some());
        assert!(client.recipes_by_ingredients(&b).await.is_some());

        assert_eq!(client.inner().call_counts().await.recipes_by_ingredients, 1);
    }

    #[tokio::test]
    async fn test_operations_use_distinct_keys() {
        let client = cached(MockRecipeClient::new());

        assert!(client.recipe_details(5).await.is_some());
        assert!(client.ingredients(5).await.is_some());

        let counts = client.inner().call_counts().await;
        assert_eq!(counts.recipe_details, 1);
        assert_eq!(counts.ingredients, 1);
        assert_eq!(client.coordinator().store().stats().valid_entries, 2);
    }
}
