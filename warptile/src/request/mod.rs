//! Tile requests: parameter normalization, URL building and cache keys.
//!
//! ```
//! use url::Url;
//! use warptile::request::{build_url, CacheKey, TileDefaults, TileRequest};
//!
//! let defaults = TileDefaults { width: 512, height: 512, bands: "1,2,3".into() };
//! let request = TileRequest::new([0.0, 0.0, 10.0, 10.0], "EPSG:3857", "dem.tif");
//! let normalized = request.normalize(&defaults);
//!
//! let endpoint = Url::parse("https://tiles.example.com/warp").unwrap();
//! let url = build_url(&endpoint, &normalized);
//! assert!(url.as_str().ends_with("&width=512&height=512"));
//!
//! let key = CacheKey::from_request(&normalized).unwrap();
//! assert!(key.as_str().contains("\"crs\":\"EPSG:3857\""));
//! ```

mod key;
mod types;
mod url_builder;

pub use key::CacheKey;
pub use types::{Bbox, NormalizedRequest, TileDefaults, TileRequest};
pub use url_builder::build_url;
