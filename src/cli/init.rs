//! Init command implementation

use colored::Colorize;
use dialoguer::{Password, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::{ConfigError, Result};

/// Run the init command
///
/// The key comes from `--api-key` (or `DISHIFY_API_KEY`) when given, and is
/// prompted for otherwise. Existing cache and HTTP settings are preserved.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to Dishify!".bold().green());
    println!("Let's set up your recipe API configuration.\n");

    let api_key = match opts.api_key_ref() {
        Some(key) => key.to_string(),
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter your Spoonacular API key")
            .interact()?,
    };

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(ConfigError::MissingApiKey.into());
    }

    let mut config = Config::load_or_default(opts.config_ref())?;
    config.apply_overrides(Some(&api_key), opts.api_host_ref());
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "dishify status".cyan());
    println!("  {} - Look up a recipe", "dishify recipe 716429".cyan());
    println!(
        "  {} - Find recipes by ingredient",
        "dishify search apple,flour".cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use tempfile::TempDir;

    fn opts(config: &str, api_key: Option<&str>) -> GlobalOptions {
        GlobalOptions {
            format: OutputFormat::Pretty,
            config: Some(config.to_string()),
            api_key: api_key.map(str::to_string),
            api_host: None,
            no_cache: false,
            concurrency: 1,
            stats: false,
        }
    }

    #[test]
    fn test_init_with_flag_key_saves_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let path_str = path.to_str().unwrap();

        run(&opts(path_str, Some(" my-key "))).unwrap();

        let config = Config::load_at(Some(path_str)).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("my-key"));
    }

    #[test]
    fn test_init_preserves_existing_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "api_key: old\ncache:\n  expiration_secs: 30\n").unwrap();
        let path_str = path.to_str().unwrap();

        run(&opts(path_str, Some("new"))).unwrap();

        let config = Config::load_at(Some(path_str)).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("new"));
        assert_eq!(config.cache.expiration_secs, 30);
    }

    #[test]
    fn test_init_rejects_blank_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let result = run(&opts(path.to_str().unwrap(), Some("   ")));
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
