//! Command execution context
//!
//! Provides a unified context for command execution, eliminating boilerplate
//! for config loading, authentication validation, and client initialization.

use std::sync::Arc;

use log::warn;

use crate::cache::CachedRecipeClient;
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::SpoonacularClient;
use crate::config::Config;
use crate::error::{ConfigError, Result};

/// Context for command execution containing config, client, and runtime options.
pub struct CommandContext {
    /// Loaded and validated configuration
    pub config: Config,
    /// API client behind the single-flight cache
    pub client: Arc<CachedRecipeClient<SpoonacularClient>>,
    /// Output format preference
    pub format: OutputFormat,
    /// Identical concurrent calls per command
    pub concurrency: usize,
    /// Whether to print coordinator counters
    pub show_stats: bool,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// This handles:
    /// - Loading config from path (or default location, if present)
    /// - Applying API key / host overrides
    /// - Validating that an API key is available
    /// - Creating the API client with caching wrapper
    ///
    /// # Errors
    /// Returns error if config cannot be parsed or no API key is configured.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let mut config = Config::load_or_default(opts.config_ref())?;
        config.apply_overrides(opts.api_key_ref(), opts.api_host_ref());
        config.validate_auth()?;

        let api_key = config.api_key.clone().ok_or(ConfigError::MissingApiKey)?;
        let raw_client = SpoonacularClient::with_host(api_key, config.api_host(), &config.http)?;

        // Wrap with caching layer (disabled if --no-cache)
        let client = Arc::new(CachedRecipeClient::new(
            raw_client,
            &config.cache,
            !opts.no_cache,
        ));

        Ok(Self {
            config,
            client,
            format: opts.format,
            concurrency: opts.concurrency.max(1),
            show_stats: opts.stats,
        })
    }

    /// Cancel in-flight requests when the user presses Ctrl-C.
    ///
    /// Waiting callers are released with no result instead of hanging until
    /// their wait timeout.
    pub fn cancel_on_interrupt(&self) {
        let shutdown = self.client.coordinator().shutdown_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling in-flight requests");
                shutdown.cancel();
            }
        });
    }
}
