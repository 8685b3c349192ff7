//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;
use crate::output::formatters::{format_duration, mask_secret};

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "Dishify Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;

    match Config::load_at(opts.config_ref()) {
        Ok(mut config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            println!();

            config.apply_overrides(opts.api_key_ref(), opts.api_host_ref());

            // API key status
            match config.api_key.as_deref() {
                Some(key) if config.validate_auth().is_ok() => {
                    println!("{} API key configured ({})", "✓".green(), mask_secret(key));
                }
                _ => {
                    println!("{} API key not configured", "✗".red());
                    println!("  → Run 'dishify init' to configure");
                }
            }

            if config.api_host.is_some() {
                println!("{} Custom API host: {}", "○".dimmed(), config.api_host().cyan());
            } else {
                println!("{} API host: {}", "✓".green(), config.api_host());
            }

            // Cache settings
            if opts.no_cache {
                println!("{} Response cache disabled (--no-cache)", "⚠".yellow());
            } else {
                println!(
                    "{} Response cache: entries expire after {}",
                    "✓".green(),
                    format_duration(config.cache.expiration())
                );
            }
            println!(
                "{} Waiters give up after {}",
                "○".dimmed(),
                format_duration(config.cache.wait_timeout())
            );
            println!(
                "{} HTTP timeout {}, {} req/s after a 429",
                "○".dimmed(),
                format_duration(config.http.timeout()),
                config.http.rate_limit_per_second
            );

            println!();
        }
        Err(_) => {
            println!("{} Configuration not found", "✗".red());
            println!("  Looked in: {}", config_path.display().to_string().dimmed());
            println!();
            println!(
                "Run {} to create a configuration file.",
                "dishify init".cyan()
            );
            println!();
        }
    }

    Ok(())
}
