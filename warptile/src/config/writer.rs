//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let url = config.endpoint.url.as_deref().unwrap_or("");
    let timeout = config
        .endpoint
        .timeout
        .map(|t| t.to_string())
        .unwrap_or_default();

    format!(
        r#"[endpoint]
; Base URL of the image-warping endpoint (required), e.g. https://tiles.example.com/warp
url = {}
; HTTP timeout in seconds (leave empty to wait indefinitely)
timeout = {}
; User-Agent header sent with every tile request
user_agent = {}

[tile]
; Output size in pixels used when a request does not specify one
width = {}
height = {}
; Band selector used when a request does not specify one
bands = {}

[cache]
; Keep decoded tiles in memory (true/false)
enabled = {}
; Maximum number of cached tiles; the oldest inserted tile is evicted first
max_entries = {}
; Merge concurrent requests for the same tile into a single download (true/false)
coalesce = {}

[logging]
directory = {}
file = {}
"#,
        url,
        timeout,
        config.endpoint.user_agent,
        config.tile.width,
        config.tile.height,
        config.tile.bands,
        config.cache.enabled,
        config.cache.max_entries,
        config.cache.coalesce,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Render a path, collapsing the home directory back to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
