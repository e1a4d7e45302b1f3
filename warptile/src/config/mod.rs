//! Configuration for the tile fetcher.
//!
//! Two layers:
//!
//! - [`FetcherConfig`]: the validated, typed configuration a
//!   [`TileFetcher`](crate::fetcher::TileFetcher) is built from.
//! - [`ConfigFile`]: the user's `~/.warptile/config.ini`, loaded with
//!   defaults for anything missing and converted into a `FetcherConfig`.
//!
//! # Example
//!
//! ```
//! use warptile::config::{ConfigFile, FetcherConfig};
//!
//! let config = FetcherConfig::new("https://tiles.example.com/warp").with_cache(false);
//! assert!(!config.cache_enabled);
//!
//! let file = ConfigFile::default();
//! let from_file = file.to_fetcher_config(Some("https://tiles.example.com/warp")).unwrap();
//! assert_eq!(from_file.max_cache_size, 50);
//! ```

mod defaults;
mod fetcher;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use fetcher::FetcherConfig;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{CacheSettings, ConfigFile, EndpointSettings, LoggingSettings, TileSettings};
