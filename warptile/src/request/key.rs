//! Cache key generation.

use std::fmt;

use super::types::NormalizedRequest;
use crate::error::TileError;

/// Cache key for a normalized request.
///
/// The key is the canonical JSON serialization of
/// `{bbox, crs, source, bands, width, height}` in that order. Equal
/// effective parameters always produce byte-identical keys; a bbox passed as
/// coordinates and the same bbox passed as text do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a normalized request.
    pub fn from_request(request: &NormalizedRequest<'_>) -> Result<Self, TileError> {
        serde_json::to_string(request)
            .map(Self)
            .map_err(|e| TileError::Internal(format!("failed to serialize cache key: {}", e)))
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{TileDefaults, TileRequest};

    fn defaults() -> TileDefaults {
        TileDefaults {
            width: 512,
            height: 512,
            bands: "1,2,3".to_string(),
        }
    }

    fn key_for(request: &TileRequest) -> CacheKey {
        let defaults = defaults();
        CacheKey::from_request(&request.normalize(&defaults)).unwrap()
    }

    #[test]
    fn test_key_field_order() {
        let request = TileRequest::new([0.0, 1.0, 2.0, 3.0], "EPSG:4326", "a.tif");
        assert_eq!(
            key_for(&request).as_str(),
            r#"{"bbox":[0.0,1.0,2.0,3.0],"crs":"EPSG:4326","source":"a.tif","bands":"1,2,3","width":512,"height":512}"#
        );
    }

    #[test]
    fn test_equal_effective_values_share_key() {
        let implicit = TileRequest::new([0.0, 1.0, 2.0, 3.0], "EPSG:4326", "a.tif");
        let explicit = TileRequest::new([0.0, 1.0, 2.0, 3.0], "EPSG:4326", "a.tif")
            .with_bands("1,2,3")
            .with_size(512, 512);

        assert_eq!(key_for(&implicit), key_for(&explicit));
    }

    #[test]
    fn test_distinct_fields_change_key() {
        let base = TileRequest::new([0.0, 1.0, 2.0, 3.0], "EPSG:4326", "a.tif");
        let other_source = TileRequest::new([0.0, 1.0, 2.0, 3.0], "EPSG:4326", "b.tif");
        let other_width = base.clone().with_width(256);

        assert_ne!(key_for(&base), key_for(&other_source));
        assert_ne!(key_for(&base), key_for(&other_width));
    }

    #[test]
    fn test_bbox_representation_is_not_normalized() {
        let coords = TileRequest::new([0.0, 1.0, 2.0, 3.0], "EPSG:4326", "a.tif");
        let text = TileRequest::new("0,1,2,3", "EPSG:4326", "a.tif");

        assert_ne!(key_for(&coords), key_for(&text));
        assert!(key_for(&text).as_str().starts_with(r#"{"bbox":"0,1,2,3""#));
    }

    #[test]
    fn test_negative_zero_shares_key_with_zero() {
        let negative = TileRequest::new([-0.0, 0.0, 1.0, -0.0], "EPSG:4326", "a.tif");
        let positive = TileRequest::new([0.0, 0.0, 1.0, 0.0], "EPSG:4326", "a.tif");

        assert_eq!(key_for(&negative), key_for(&positive));
        assert!(key_for(&negative)
            .as_str()
            .starts_with(r#"{"bbox":[0.0,0.0,1.0,0.0],"#));
    }

    #[test]
    fn test_key_is_stable_across_calls() {
        let request = TileRequest::new("0,1,2,3", "+proj=longlat", "a.tif").with_bands("2");
        assert_eq!(key_for(&request).as_str(), key_for(&request.clone()).as_str());
    }
}
