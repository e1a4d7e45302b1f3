//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Remote endpoint settings
    pub endpoint: EndpointSettings,
    /// Default tile parameters
    pub tile: TileSettings,
    /// Cache settings
    pub cache: CacheSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// `[endpoint]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSettings {
    /// Base URL of the warp endpoint
    pub url: Option<String>,
    /// HTTP timeout in seconds (none = wait forever)
    pub timeout: Option<u64>,
    /// User-Agent header value
    pub user_agent: String,
}

/// `[tile]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSettings {
    pub width: u32,
    pub height: u32,
    pub bands: String,
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Whether decoded tiles are memoized
    pub enabled: bool,
    /// Maximum number of cached tiles
    pub max_entries: usize,
    /// Merge concurrent identical requests into one network call
    pub coalesce: bool,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}
