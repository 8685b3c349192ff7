//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

use crate::client::IngredientList;

pub mod args;
pub mod context;
pub mod init;
pub mod recipe;
pub mod status;

pub use args::OutputFormat;
pub use context::CommandContext;

/// Dishify - recipe discovery from the command line
#[derive(Parser, Debug)]
#[command(name = "dishify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, json)
    #[arg(
        long,
        global = true,
        env = "DISHIFY_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "DISHIFY_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Recipe API key (overrides config file)
    #[arg(
        long,
        global = true,
        env = "DISHIFY_API_KEY",
        hide_env = true,
        hide_env_values = true
    )]
    pub api_key: Option<String>,

    /// Custom API host for development/testing
    #[arg(long, global = true, env = "DISHIFY_API_HOST", hide_env = true)]
    pub api_host: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "DISHIFY_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass cache, fetch fresh data from API
    #[arg(long, global = true, env = "DISHIFY_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Issue this many identical requests concurrently (they share one fetch)
    #[arg(
        long,
        global = true,
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..=64)
    )]
    pub concurrency: u16,

    /// Print request coordination counters after the command
    #[arg(long, global = true)]
    pub stats: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save your recipe API key to the config file
    Init,

    /// Show configuration status
    Status,

    /// Display version information
    Version,

    /// Show full information for a recipe
    Recipe {
        /// Recipe ID
        id: u64,
    },

    /// Show the ingredients of a recipe
    Ingredients {
        /// Recipe ID
        id: u64,
    },

    /// Find recipes that use the given ingredients
    Search {
        /// Comma-separated ingredient list (e.g. "apple,flour,sugar")
        ingredients: IngredientList,
    },

    /// Find recipes by diet, intolerance and calories
    Filter {
        /// Diet (e.g. vegetarian, vegan, ketogenic)
        #[arg(long, default_value = "")]
        diet: String,

        /// Comma-separated intolerances (e.g. gluten,dairy)
        #[arg(long, default_value = "")]
        intolerance: String,

        /// Minimum calories per serving
        #[arg(long, default_value_t = 0)]
        min_calories: u32,

        /// Maximum calories per serving
        #[arg(long, default_value_t = 2000)]
        max_calories: u32,
    },
}
