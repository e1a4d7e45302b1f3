//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use warptile::config::ConfigFileError;
use warptile::TileError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Failed to create the fetcher
    FetcherCreation(TileError),
    /// Failed to fetch a tile
    Fetch(TileError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Failed to write output file
    FileWrite {
        path: String,
        error: image::ImageError,
    },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(ConfigFileError::MissingEndpoint(_)) => {
                eprintln!();
                eprintln!("Either pass the endpoint for this run:");
                eprintln!("  warptile fetch --endpoint https://host/warp ...");
                eprintln!("or create a config file and set [endpoint] url:");
                eprintln!("  warptile config init");
            }
            CliError::Fetch(TileError::Fetch { status: 400..=499, .. }) => {
                eprintln!();
                eprintln!("The endpoint rejected the request. Check that:");
                eprintln!("  1. The source path is readable by the endpoint");
                eprintln!("  2. The bbox is expressed in units of the given CRS");
                eprintln!("  3. The band indexes exist in the source");
            }
            CliError::Fetch(TileError::Transport { .. }) => {
                eprintln!();
                eprintln!("Could not reach the endpoint. Check the URL and your network,");
                eprintln!("or raise [endpoint] timeout in the config file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::FetcherCreation(e) => write!(f, "Failed to create fetcher: {}", e),
            CliError::Fetch(e) => write!(f, "Failed to fetch tile: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::FetcherCreation(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<TileError> for CliError {
    fn from(e: TileError) -> Self {
        CliError::Fetch(e)
    }
}
