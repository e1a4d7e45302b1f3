//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, fetcher creation and
//! file output so command handlers stay small.

use crate::error::CliError;
use image::RgbaImage;
use std::path::Path;
use tracing::info;
use warptile::config::ConfigFile;
use warptile::logging::{init_logging, LoggingGuard};
use warptile::{FetcherConfig, TileFetcher};

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps logging active while the runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load the config file and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `debug_mode` - When true, logs at debug level unless RUST_LOG says otherwise
    pub fn with_debug(debug_mode: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let level = if debug_mode { "warptile=debug,info" } else { "warn" };
        let logging_guard = init_logging(&config.logging.directory, &config.logging.file, level)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("warptile v{}", warptile::VERSION);
        info!("warptile CLI: {} command", command);
    }

    /// Resolve the fetcher configuration, letting `endpoint` override the file.
    pub fn fetcher_config(&self, endpoint: Option<&str>) -> Result<FetcherConfig, CliError> {
        Ok(self.config.to_fetcher_config(endpoint)?)
    }

    /// Create a fetcher from a resolved configuration.
    pub fn create_fetcher(&self, config: FetcherConfig) -> Result<TileFetcher, CliError> {
        TileFetcher::new(config)
            .map_err(CliError::FetcherCreation)
            .inspect(|_| info!("Fetcher created successfully"))
    }

    /// Run a future to completion on a fresh multi-threaded runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> Result<F::Output, CliError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;
        Ok(runtime.block_on(future))
    }

    /// Save an image, picking the format from the file extension.
    pub fn save_image(&self, path: &str, image: &RgbaImage) -> Result<(), CliError> {
        save_image(Path::new(path), image)?;
        info!(path, width = image.width(), height = image.height(), "Tile saved");
        Ok(())
    }
}

fn save_image(path: &Path, image: &RgbaImage) -> Result<(), CliError> {
    image.save(path).map_err(|error| CliError::FileWrite {
        path: path.display().to_string(),
        error,
    })
}
