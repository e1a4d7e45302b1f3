//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show`, and `config init` for inspecting
//! and creating ~/.warptile/config.ini.

use clap::Subcommand;
use warptile::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration (file values merged with defaults)
    Show,

    /// Create the configuration file with defaults if it doesn't exist
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init => run_init(),
    }
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

/// Show the effective configuration.
fn run_show() -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    println!("Configuration Settings");
    println!("======================");
    println!();
    for line in describe(&config) {
        println!("{}", line);
    }

    Ok(())
}

fn run_init() -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() {
        println!("Configuration file already exists: {}", path.display());
        return Ok(());
    }

    let path = ConfigFile::ensure_exists()?;
    println!("Created configuration file: {}", path.display());
    println!("Set [endpoint] url before running 'warptile fetch'.");
    Ok(())
}

fn describe(config: &ConfigFile) -> Vec<String> {
    let or_unset = |value: Option<String>| value.unwrap_or_else(|| "(not set)".to_string());

    vec![
        "[endpoint]".to_string(),
        format!("  url = {}", or_unset(config.endpoint.url.clone())),
        format!(
            "  timeout = {}",
            or_unset(config.endpoint.timeout.map(|t| format!("{}s", t)))
        ),
        format!("  user_agent = {}", config.endpoint.user_agent),
        String::new(),
        "[tile]".to_string(),
        format!("  width = {}", config.tile.width),
        format!("  height = {}", config.tile.height),
        format!("  bands = {}", config.tile.bands),
        String::new(),
        "[cache]".to_string(),
        format!("  enabled = {}", config.cache.enabled),
        format!("  max_entries = {}", config.cache.max_entries),
        format!("  coalesce = {}", config.cache.coalesce),
        String::new(),
        "[logging]".to_string(),
        format!("  directory = {}", config.logging.directory.display()),
        format!("  file = {}", config.logging.file),
    ]
}
