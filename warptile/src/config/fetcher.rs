//! Fetcher configuration.

use std::time::Duration;
use url::Url;

use super::defaults::*;
use crate::error::TileError;

/// Configuration for a [`TileFetcher`](crate::fetcher::TileFetcher).
///
/// Only `endpoint` is required. Everything else has a documented default:
///
/// | field | default |
/// |---|---|
/// | `width` / `height` | 512 |
/// | `bands` | `"1,2,3"` |
/// | `cache_enabled` | `true` |
/// | `max_cache_size` | 50 |
/// | `timeout` | none |
/// | `coalesce_in_flight` | `false` |
///
/// # Example
///
/// ```
/// use warptile::config::FetcherConfig;
///
/// let config = FetcherConfig::new("https://tiles.example.com/warp")
///     .with_size(256, 256)
///     .with_max_cache_size(100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    /// Base URL of the warp endpoint
    pub endpoint: String,
    /// Output width used when a request omits it
    pub width: u32,
    /// Output height used when a request omits it
    pub height: u32,
    /// Band selector used when a request omits it
    pub bands: String,
    /// Memoize decoded bitmaps
    pub cache_enabled: bool,
    /// Upper bound on cached bitmaps
    pub max_cache_size: usize,
    /// HTTP timeout; `None` waits forever
    pub timeout: Option<Duration>,
    /// Merge concurrent fetches for the same key into one network call
    pub coalesce_in_flight: bool,
    /// User-Agent header value
    pub user_agent: String,
}

impl FetcherConfig {
    /// Create a configuration for the given endpoint with all defaults.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            bands: DEFAULT_BANDS.to_string(),
            cache_enabled: DEFAULT_CACHE_ENABLED,
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            timeout: None,
            coalesce_in_flight: DEFAULT_COALESCE_IN_FLIGHT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set default output dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the default band selector.
    pub fn with_bands(mut self, bands: impl Into<String>) -> Self {
        self.bands = bands.into();
        self
    }

    /// Enable or disable caching.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Set the maximum number of cached bitmaps.
    pub fn with_max_cache_size(mut self, max: usize) -> Self {
        self.max_cache_size = max;
        self
    }

    /// Set an HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enable or disable in-flight request coalescing.
    pub fn with_coalescing(mut self, enabled: bool) -> Self {
        self.coalesce_in_flight = enabled;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validate the configuration and return the parsed endpoint.
    ///
    /// Called once by the fetcher constructor; a fetcher never holds an
    /// invalid configuration.
    pub fn validate(&self) -> Result<Url, TileError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(TileError::Configuration(
                "endpoint is required".to_string(),
            ));
        }

        let url = Url::parse(endpoint).map_err(|e| {
            TileError::Configuration(format!("invalid endpoint '{}': {}", endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TileError::Configuration(format!(
                "endpoint '{}' must use http or https",
                endpoint
            )));
        }

        if self.max_cache_size == 0 {
            return Err(TileError::Configuration(
                "max_cache_size must be a positive integer".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(TileError::Configuration(format!(
                "default size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.bands.trim().is_empty() {
            return Err(TileError::Configuration(
                "default bands must not be empty".to_string(),
            ));
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetcherConfig::new("https://x/tile");
        assert_eq!(config.width, 512);
        assert_eq!(config.height, 512);
        assert_eq!(config.bands, "1,2,3");
        assert!(config.cache_enabled);
        assert_eq!(config.max_cache_size, 50);
        assert!(config.timeout.is_none());
        assert!(!config.coalesce_in_flight);
    }

    #[test]
    fn test_builder_methods() {
        let config = FetcherConfig::new("https://x/tile")
            .with_size(256, 128)
            .with_bands("4,3,2")
            .with_cache(false)
            .with_max_cache_size(2)
            .with_timeout(Duration::from_secs(5))
            .with_coalescing(true)
            .with_user_agent("test-agent");

        assert_eq!((config.width, config.height), (256, 128));
        assert_eq!(config.bands, "4,3,2");
        assert!(!config.cache_enabled);
        assert_eq!(config.max_cache_size, 2);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(config.coalesce_in_flight);
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_validate_accepts_valid_endpoint() {
        let url = FetcherConfig::new("https://x/tile").validate().unwrap();
        assert_eq!(url.as_str(), "https://x/tile");
    }

    #[test]
    fn test_validate_rejects_empty_endpoint() {
        let err = FetcherConfig::new("").validate().unwrap_err();
        assert!(err.is_configuration());

        let err = FetcherConfig::new("   ").validate().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_validate_rejects_relative_endpoint() {
        let err = FetcherConfig::new("/tile").validate().unwrap_err();
        assert!(err.to_string().contains("invalid endpoint"));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let err = FetcherConfig::new("ftp://x/tile").validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_validate_rejects_zero_cache_size() {
        let err = FetcherConfig::new("https://x/tile")
            .with_max_cache_size(0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("max_cache_size"));
    }

    #[test]
    fn test_validate_rejects_zero_size_and_empty_bands() {
        assert!(FetcherConfig::new("https://x/tile")
            .with_size(0, 512)
            .validate()
            .is_err());
        assert!(FetcherConfig::new("https://x/tile")
            .with_bands("")
            .validate()
            .is_err());
    }
}
