//! Warptile - cached raster tiles from a remote image-warping endpoint
//!
//! A warp endpoint reprojects and crops a source raster on demand: given a
//! bounding box, a CRS, a source dataset and output parameters it returns an
//! encoded image. This library turns those requests into drawable bitmaps
//! and memoizes them in a bounded, insertion-ordered cache.
//!
//! # High-Level API
//!
//! ```no_run
//! use image::RgbaImage;
//! use warptile::{FetcherConfig, TileFetcher, TileRequest};
//!
//! # async fn run() -> Result<(), warptile::TileError> {
//! let config = FetcherConfig::new("https://tiles.example.com/warp").with_max_cache_size(100);
//! let fetcher = TileFetcher::new(config)?;
//!
//! let request = TileRequest::new("0,0,10,10", "EPSG:3857", "s3://imagery/scene.tif")
//!     .with_bands("4,3,2");
//!
//! let mut canvas = RgbaImage::new(1024, 1024);
//! fetcher.fetch_and_draw_at(&mut canvas, &request, 256, 256).await?;
//! # Ok(())
//! # }
//! ```

pub mod bitmap;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod logging;
pub mod request;

pub use bitmap::{Bitmap, DrawSurface};
pub use cache::CacheStats;
pub use config::FetcherConfig;
pub use error::TileError;
pub use fetcher::{CoalescerStats, TileFetcher};
pub use request::{Bbox, CacheKey, TileRequest};

/// Version of the warptile library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
