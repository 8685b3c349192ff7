//! Dishify CLI - recipe discovery with single-flight response caching

use clap::Parser;

mod cache;
mod cli;
mod client;
mod config;
mod error;
mod output;

use cli::args::GlobalOptions;
use cli::{Cli, Commands};
use client::RecipeFilters;
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --debug
    let default_level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Init => cli::init::run(&opts),
        Commands::Status => cli::status::run(&opts),
        Commands::Version => {
            println!("dishify version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Recipe { id } => cli::recipe::details(&opts, id).await,
        Commands::Ingredients { id } => cli::recipe::ingredients(&opts, id).await,
        Commands::Search { ingredients } => cli::recipe::search(&opts, &ingredients).await,
        Commands::Filter {
            diet,
            intolerance,
            min_calories,
            max_calories,
        } => {
            let filters = RecipeFilters {
                diet,
                intolerance,
                min_calories,
                max_calories,
            };
            cli::recipe::filter(&opts, &filters).await
        }
    }
}
