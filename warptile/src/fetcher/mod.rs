//! Tile fetch orchestration.
//!
//! [`TileFetcher`] ties the pieces together:
//!
//! ```text
//! fetch(request)
//!   ├─ normalize + cache key
//!   ├─ cache hit ──────────────────────────────► bitmap
//!   └─ miss ─► build URL ─► GET ─► decode ─► cache insert ─► bitmap
//! ```
//!
//! Failures (non-success status, transport error, undecodable body) are
//! returned to the caller and never cached.

mod coalesce;

pub use coalesce::CoalescerStats;

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::bitmap::{decode_blocking, Bitmap, DrawSurface};
use crate::cache::{CacheStats, TileCache};
use crate::config::FetcherConfig;
use crate::error::TileError;
use crate::http::{AsyncHttpClient, AsyncReqwestClient};
use crate::request::{build_url, CacheKey, NormalizedRequest, TileDefaults, TileRequest};
use coalesce::{wait_for_leader, Registration, RequestCoalescer};

/// Fetches warped tiles from a remote endpoint and memoizes the bitmaps.
///
/// Each fetcher owns exactly one [`TileCache`]; caches are never shared
/// between fetchers.
///
/// # Example
///
/// ```no_run
/// use warptile::{FetcherConfig, TileFetcher, TileRequest};
///
/// # async fn run() -> Result<(), warptile::TileError> {
/// let fetcher = TileFetcher::new(FetcherConfig::new("https://tiles.example.com/warp"))?;
/// let request = TileRequest::new([500000.0, 4649776.0, 510000.0, 4659776.0], "EPSG:32633", "s3://imagery/scene.tif");
///
/// let tile = fetcher.fetch(&request).await?;
/// println!("{}x{}", tile.width(), tile.height());
/// # Ok(())
/// # }
/// ```
pub struct TileFetcher<C = AsyncReqwestClient> {
    config: FetcherConfig,
    endpoint: Url,
    defaults: TileDefaults,
    client: C,
    cache: Mutex<TileCache>,
    coalescer: Option<RequestCoalescer>,
}

impl TileFetcher<AsyncReqwestClient> {
    /// Create a fetcher backed by a reqwest client.
    ///
    /// Fails with [`TileError::Configuration`] if the configuration is
    /// invalid (missing endpoint, zero cache size, ...).
    pub fn new(config: FetcherConfig) -> Result<Self, TileError> {
        config.validate()?;
        let client = AsyncReqwestClient::new(&config.user_agent, config.timeout)?;
        Self::with_client(config, client)
    }
}

impl<C: AsyncHttpClient> TileFetcher<C> {
    /// Create a fetcher with a custom HTTP client.
    pub fn with_client(config: FetcherConfig, client: C) -> Result<Self, TileError> {
        let endpoint = config.validate()?;

        info!(
            endpoint = %endpoint,
            cache_enabled = config.cache_enabled,
            max_cache_size = config.max_cache_size,
            coalesce_in_flight = config.coalesce_in_flight,
            "Tile fetcher created"
        );

        Ok(Self {
            defaults: TileDefaults {
                width: config.width,
                height: config.height,
                bands: config.bands.clone(),
            },
            cache: Mutex::new(TileCache::new(config.max_cache_size)),
            coalescer: config.coalesce_in_flight.then(RequestCoalescer::new),
            endpoint,
            client,
            config,
        })
    }

    /// Fetch the tile for `request`, serving it from the cache when possible.
    ///
    /// A cache hit returns without any network I/O. On a miss the tile is
    /// downloaded, decoded and (when caching is enabled) inserted, which may
    /// evict the oldest cached tile.
    ///
    /// Concurrent fetches for the same tile each download it unless
    /// `coalesce_in_flight` is enabled.
    #[instrument(skip(self, request), fields(source = %request.source, crs = %request.crs))]
    pub async fn fetch(&self, request: &TileRequest) -> Result<Arc<Bitmap>, TileError> {
        let normalized = request.normalize(&self.defaults);
        let key = CacheKey::from_request(&normalized)?;

        if self.config.cache_enabled {
            let cached = self.cache.lock().get(&key);
            if let Some(bitmap) = cached {
                debug!(key = %key, "Tile cache hit");
                return Ok(bitmap);
            }
        }

        let Some(coalescer) = &self.coalescer else {
            return self.download(&normalized, key).await;
        };

        match coalescer.register(&key) {
            Registration::Follower(rx) => wait_for_leader(rx).await,
            Registration::Leader(leader) => {
                // The previous leader may have filled the cache since our check
                let cached = self.cached(&key);
                let result = match cached {
                    Some(bitmap) => Ok(bitmap),
                    None => self.download(&normalized, key).await,
                };
                leader.complete(&result);
                result
            }
        }
    }

    /// Fetch a tile and draw it at the surface origin.
    pub async fn fetch_and_draw<S>(
        &self,
        surface: &mut S,
        request: &TileRequest,
    ) -> Result<Arc<Bitmap>, TileError>
    where
        S: DrawSurface + ?Sized,
    {
        self.fetch_and_draw_at(surface, request, 0, 0).await
    }

    /// Fetch a tile and draw it with its top-left corner at (`x`, `y`).
    ///
    /// Returns the same bitmap that was drawn. Nothing is drawn on failure.
    pub async fn fetch_and_draw_at<S>(
        &self,
        surface: &mut S,
        request: &TileRequest,
        x: i64,
        y: i64,
    ) -> Result<Arc<Bitmap>, TileError>
    where
        S: DrawSurface + ?Sized,
    {
        let bitmap = self.fetch(request).await?;
        surface.draw_bitmap(&bitmap, x, y);
        Ok(bitmap)
    }

    /// Drop every cached tile.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.lock();
        let released = cache.len();
        cache.clear();
        info!(released, "Tile cache cleared");
    }

    /// Number of cached tiles.
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Whether the tile for `request` is currently cached.
    pub fn is_cached(&self, request: &TileRequest) -> bool {
        self.cache_key_for(request)
            .map(|key| self.cache.lock().contains(&key))
            .unwrap_or(false)
    }

    /// Cache key the fetcher uses for `request`.
    pub fn cache_key_for(&self, request: &TileRequest) -> Result<CacheKey, TileError> {
        CacheKey::from_request(&request.normalize(&self.defaults))
    }

    /// URL the fetcher requests for `request`.
    pub fn url_for(&self, request: &TileRequest) -> Url {
        build_url(&self.endpoint, &request.normalize(&self.defaults))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    /// Coalescing statistics, when coalescing is enabled.
    pub fn coalescer_stats(&self) -> Option<CoalescerStats> {
        self.coalescer.as_ref().map(RequestCoalescer::stats)
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    fn cached(&self, key: &CacheKey) -> Option<Arc<Bitmap>> {
        if !self.config.cache_enabled {
            return None;
        }
        self.cache.lock().peek(key)
    }

    async fn download(
        &self,
        request: &NormalizedRequest<'_>,
        key: CacheKey,
    ) -> Result<Arc<Bitmap>, TileError> {
        let url = build_url(&self.endpoint, request);
        debug!(url = %url, "Fetching tile");

        let response = match self.client.get(url.as_str()).await {
            Ok(response) => response,
            Err(e) => {
                self.cache.lock().stats_mut().record_download_failure();
                return Err(e);
            }
        };

        if !response.is_success() {
            warn!(
                url = %url,
                status = response.status,
                status_text = %response.status_text,
                "Tile request failed"
            );
            self.cache.lock().stats_mut().record_download_failure();
            return Err(TileError::Fetch {
                status: response.status,
                status_text: response.status_text,
                url: url.to_string(),
            });
        }

        self.cache
            .lock()
            .stats_mut()
            .record_download(response.body.len() as u64);

        let bitmap = Arc::new(decode_blocking(response.body).await?);

        if self.config.cache_enabled {
            let evicted = self.cache.lock().put(key, Arc::clone(&bitmap));
            if let Some(evicted) = evicted {
                debug!(evicted = %evicted, "Cache full, evicted oldest tile");
            }
        }

        Ok(bitmap)
    }
}
