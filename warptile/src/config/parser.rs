//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [endpoint] section
    if let Some(section) = ini.section(Some("endpoint")) {
        if let Some(v) = section.get("url") {
            let v = v.trim();
            if !v.is_empty() {
                config.endpoint.url = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("timeout") {
            let v = v.trim();
            if !v.is_empty() {
                config.endpoint.timeout = Some(parse_positive("endpoint", "timeout", v)?);
            }
        }
        if let Some(v) = section.get("user_agent") {
            let v = v.trim();
            if !v.is_empty() {
                config.endpoint.user_agent = v.to_string();
            }
        }
    }

    // [tile] section
    if let Some(section) = ini.section(Some("tile")) {
        if let Some(v) = section.get("width") {
            config.tile.width = parse_positive("tile", "width", v)?;
        }
        if let Some(v) = section.get("height") {
            config.tile.height = parse_positive("tile", "height", v)?;
        }
        if let Some(v) = section.get("bands") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid(
                    "tile",
                    "bands",
                    v,
                    "must be a comma-separated list like '1,2,3'",
                ));
            }
            config.tile.bands = v.to_string();
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("enabled") {
            config.cache.enabled = parse_bool("cache", "enabled", v)?;
        }
        if let Some(v) = section.get("max_entries") {
            config.cache.max_entries = parse_positive("cache", "max_entries", v)?;
        }
        if let Some(v) = section.get("coalesce") {
            config.cache.coalesce = parse_bool("cache", "coalesce", v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_value<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive<T>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + Default + PartialEq,
{
    let parsed: T = parse_value(section, key, value, "must be a positive integer")?;
    if parsed == T::default() {
        return Err(invalid(section, key, value, "must be a positive integer"));
    }
    Ok(parsed)
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(section, key, value, "must be 'true' or 'false'")),
    }
}

/// Expand a leading `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
