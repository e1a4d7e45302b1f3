//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::settings::*;

/// Default output width in pixels.
pub const DEFAULT_WIDTH: u32 = 512;

/// Default output height in pixels.
pub const DEFAULT_HEIGHT: u32 = 512;

/// Default band selector (RGB from the first three bands).
pub const DEFAULT_BANDS: &str = "1,2,3";

/// Caching is on unless explicitly disabled.
pub const DEFAULT_CACHE_ENABLED: bool = true;

/// Default bound on cached bitmaps.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 50;

/// Concurrent identical requests are not merged by default.
pub const DEFAULT_COALESCE_IN_FLIGHT: bool = false;

/// Default User-Agent sent with tile requests.
pub const DEFAULT_USER_AGENT: &str = concat!("warptile/", env!("CARGO_PKG_VERSION"));

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "warptile.log";

/// Default log directory (~/.warptile/logs).
pub fn default_log_directory() -> PathBuf {
    super::file::config_directory().join("logs")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            endpoint: EndpointSettings {
                url: None,
                timeout: None,
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            tile: TileSettings {
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
                bands: DEFAULT_BANDS.to_string(),
            },
            cache: CacheSettings {
                enabled: DEFAULT_CACHE_ENABLED,
                max_entries: DEFAULT_MAX_CACHE_SIZE,
                coalesce: DEFAULT_COALESCE_IN_FLIGHT,
            },
            logging: LoggingSettings {
                directory: default_log_directory(),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
