//! Spoonacular recipe API client implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client as HttpClient, StatusCode, Url};

use super::rate_limit::ReactiveRateLimiter;
use super::{IngredientList, RecipeApi, RecipeFilters};
use crate::config::HttpSettings;
use crate::error::{ApiError, ConfigError, Result};

/// Spoonacular API client
pub struct SpoonacularClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    rate_limiter: Arc<ReactiveRateLimiter>,
}

impl SpoonacularClient {
    /// Create a client against an API host (the public one, or a local
    /// server for development/testing)
    pub fn with_host(api_key: String, host: &str, settings: &HttpSettings) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: host.trim_end_matches('/').to_string(),
            api_key,
            rate_limiter: Arc::new(ReactiveRateLimiter::new(settings.rate_limit_per_second)),
        })
    }

    /// Build a request URL with the API key appended
    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ConfigError::Invalid(format!("Invalid API host: {}", e)))?;

        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("apiKey", &self.api_key);

        Ok(url)
    }

    /// Perform a GET and return the body text for a 200 response
    pub async fn get_text(&self, url: Url) -> Result<String> {
        self.rate_limiter.wait_if_active().await;

        // Path only: the query carries the API key
        debug!("GET {}", url.path());

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let body = response.text().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to read response: {}", e))
                })?;
                Ok(body)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::PAYMENT_REQUIRED => Err(ApiError::QuotaExceeded.into()),
            StatusCode::NOT_FOUND => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Resource not found".to_string());
                Err(ApiError::NotFound(error_msg).into())
            }
            StatusCode::TOO_MANY_REQUESTS => {
                self.rate_limiter.activate();
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                warn!("Rate limited by recipe API, retry after {}s", retry_after);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}

#[async_trait]
impl RecipeApi for SpoonacularClient {
    async fn recipe_details(&self, recipe_id: u64) -> Result<String> {
        let path = format!("/recipes/{}/information", recipe_id);
        let url = self.url(&path, &[("includeNutrition", "false".to_string())])?;
        self.get_text(url).await
    }

    async fn ingredients(&self, recipe_id: u64) -> Result<String> {
        let path = format!("/recipes/{}/ingredientWidget.json", recipe_id);
        let url = self.url(&path, &[])?;
        self.get_text(url).await
    }

    async fn recipes_by_ingredients(&self, ingredients: &IngredientList) -> Result<String> {
        let url = self.url(
            "/recipes/findByIngredients",
            &[("ingredients", ingredients.to_string())],
        )?;
        self.get_text(url).await
    }

    async fn filtered_recipes(&self, filters: &RecipeFilters) -> Result<String> {
        let url = self.url(
            "/recipes/complexSearch",
            &[
                ("diet", filters.diet.clone()),
                ("intolerances", filters.intolerance.clone()),
                ("minCalories", filters.min_calories.to_string()),
                ("maxCalories", filters.max_calories.to_string()),
            ],
        )?;
        self.get_text(url).await
    }
}
