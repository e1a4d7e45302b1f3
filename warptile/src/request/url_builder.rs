//! Request URL construction.

use url::Url;

use super::types::NormalizedRequest;

/// Build the GET URL for a normalized request.
///
/// Appends `bbox`, `crs`, `source`, `bands`, `width` and `height` (in that
/// order) to the endpoint's query string using form-urlencoding. Values are
/// not validated; a malformed bbox or CRS surfaces as an HTTP error from the
/// endpoint.
pub fn build_url(endpoint: &Url, request: &NormalizedRequest<'_>) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("bbox", &request.bbox.to_string())
        .append_pair("crs", request.crs)
        .append_pair("source", request.source)
        .append_pair("bands", request.bands)
        .append_pair("width", &request.width.to_string())
        .append_pair("height", &request.height.to_string());
    url
}
