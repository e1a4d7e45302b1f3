//! Tile request types and parameter normalization.

use serde::{Serialize, Serializer};
use std::fmt;

/// Bounding box of the requested window, in target CRS units.
///
/// Either four ordered coordinates `xmin, ymin, xmax, ymax` or a
/// pre-formatted `"xmin,ymin,xmax,ymax"` string that is passed through as-is.
/// The two forms are kept distinct: equal values in different forms are
/// different cache keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Bbox {
    /// `[xmin, ymin, xmax, ymax]`
    Coords([f64; 4]),
    /// Already comma-joined
    Text(String),
}

impl Bbox {
    /// Create a bbox from four coordinates.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self::Coords([xmin, ymin, xmax, ymax])
    }
}

/// Comma-joined form used in the `bbox` query parameter.
///
/// `-0.0` renders as `0`; non-finite values render as `Infinity`,
/// `-Infinity` and `NaN`.
impl fmt::Display for Bbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bbox::Coords(coords) => {
                for (i, value) in coords.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_coord(f, *value)?;
                }
                Ok(())
            }
            Bbox::Text(text) => f.write_str(text),
        }
    }
}

/// Coordinates serialize as a JSON array with negative zero folded into
/// zero, so numerically equal boxes share a cache key. Text serializes as a
/// JSON string.
impl Serialize for Bbox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Bbox::Coords(coords) => coords.map(canonical_zero).serialize(serializer),
            Bbox::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// `-0.0 + 0.0` is `+0.0`; every other value is unchanged.
fn canonical_zero(value: f64) -> f64 {
    value + 0.0
}

fn write_coord(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        f.write_str("NaN")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{}", canonical_zero(value))
    }
}

impl From<[f64; 4]> for Bbox {
    fn from(coords: [f64; 4]) -> Self {
        Self::Coords(coords)
    }
}

impl From<(f64, f64, f64, f64)> for Bbox {
    fn from((xmin, ymin, xmax, ymax): (f64, f64, f64, f64)) -> Self {
        Self::Coords([xmin, ymin, xmax, ymax])
    }
}

impl From<&str> for Bbox {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Bbox {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A request for one warped tile.
///
/// `bands`, `width` and `height` are optional; absent values (including an
/// empty band string or a zero dimension) are filled from [`TileDefaults`].
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    pub bbox: Bbox,
    /// PROJ4 string or EPSG code, opaque to this crate
    pub crs: String,
    /// Data-source locator understood by the endpoint
    pub source: String,
    /// Comma-separated band indices, e.g. `"4,3,2"`
    pub bands: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl TileRequest {
    /// Create a request using the fetcher's default bands and size.
    pub fn new(bbox: impl Into<Bbox>, crs: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            bbox: bbox.into(),
            crs: crs.into(),
            source: source.into(),
            bands: None,
            width: None,
            height: None,
        }
    }

    /// Select bands explicitly.
    pub fn with_bands(mut self, bands: impl Into<String>) -> Self {
        self.bands = Some(bands.into());
        self
    }

    /// Set both output dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the output width only.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the output height only.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Resolve effective parameters against `defaults`.
    ///
    /// Borrows from both inputs and never modifies the request.
    pub fn normalize<'a>(&'a self, defaults: &'a TileDefaults) -> NormalizedRequest<'a> {
        NormalizedRequest {
            bbox: &self.bbox,
            crs: &self.crs,
            source: &self.source,
            bands: self
                .bands
                .as_deref()
                .filter(|b| !b.is_empty())
                .unwrap_or(&defaults.bands),
            width: self.width.filter(|w| *w > 0).unwrap_or(defaults.width),
            height: self.height.filter(|h| *h > 0).unwrap_or(defaults.height),
        }
    }
}

/// Defaults substituted for absent request fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDefaults {
    pub width: u32,
    pub height: u32,
    pub bands: String,
}

/// A request with every field resolved.
///
/// Field declaration order is the cache key order and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedRequest<'a> {
    pub bbox: &'a Bbox,
    pub crs: &'a str,
    pub source: &'a str,
    pub bands: &'a str,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> TileDefaults {
        TileDefaults {
            width: 512,
            height: 512,
            bands: "1,2,3".to_string(),
        }
    }

    #[test]
    fn test_bbox_display_coords() {
        let bbox = Bbox::new(-180.0, -85.5, 180.0, 85.5);
        assert_eq!(bbox.to_string(), "-180,-85.5,180,85.5");
    }

    #[test]
    fn test_bbox_display_folds_negative_zero() {
        let bbox = Bbox::new(-0.0, 0.0, 1.0, -0.0);
        assert_eq!(bbox.to_string(), "0,0,1,0");
    }

    #[test]
    fn test_bbox_display_non_finite() {
        let bbox = Bbox::new(f64::NEG_INFINITY, f64::NAN, f64::INFINITY, 1.5);
        assert_eq!(bbox.to_string(), "-Infinity,NaN,Infinity,1.5");
    }

    #[test]
    fn test_bbox_display_text_passthrough() {
        let bbox = Bbox::from("1, 2, 3, 4");
        assert_eq!(bbox.to_string(), "1, 2, 3, 4");
    }

    #[test]
    fn test_bbox_conversions() {
        assert_eq!(Bbox::from([1.0, 2.0, 3.0, 4.0]), Bbox::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(Bbox::from((1.0, 2.0, 3.0, 4.0)), Bbox::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(
            Bbox::from("1,2,3,4".to_string()),
            Bbox::Text("1,2,3,4".to_string())
        );
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let defaults = defaults();
        let request = TileRequest::new([0.0, 0.0, 1.0, 1.0], "EPSG:4326", "a.tif");
        let normalized = request.normalize(&defaults);

        assert_eq!(normalized.bands, "1,2,3");
        assert_eq!(normalized.width, 512);
        assert_eq!(normalized.height, 512);
        assert_eq!(normalized.crs, "EPSG:4326");
        assert_eq!(normalized.source, "a.tif");
    }

    #[test]
    fn test_normalize_keeps_explicit_values() {
        let defaults = defaults();
        let request = TileRequest::new([0.0, 0.0, 1.0, 1.0], "EPSG:4326", "a.tif")
            .with_bands("4,3,2")
            .with_size(256, 128);
        let normalized = request.normalize(&defaults);

        assert_eq!(normalized.bands, "4,3,2");
        assert_eq!(normalized.width, 256);
        assert_eq!(normalized.height, 128);
    }

    #[test]
    fn test_normalize_treats_empty_and_zero_as_absent() {
        let defaults = defaults();
        let request = TileRequest::new([0.0, 0.0, 1.0, 1.0], "EPSG:4326", "a.tif")
            .with_bands("")
            .with_width(0)
            .with_height(300);
        let normalized = request.normalize(&defaults);

        assert_eq!(normalized.bands, "1,2,3");
        assert_eq!(normalized.width, 512);
        assert_eq!(normalized.height, 300);
    }

    #[test]
    fn test_normalize_does_not_mutate_request() {
        let defaults = defaults();
        let request = TileRequest::new("0,0,1,1", "EPSG:4326", "a.tif");
        let before = request.clone();
        let _ = request.normalize(&defaults);
        assert_eq!(request, before);
        assert!(request.bands.is_none());
    }
}
