// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::types::ConfigFormat;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs deserialization (JSON or TOML, chosen by extension);
/// it does **not** perform semantic validation. Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_str(&contents, ConfigFormat::from_path(path))
}

/// Deserialize configuration text in the given format.
pub fn parse_str(contents: &str, format: ConfigFormat) -> Result<RawConfigFile> {
    let config = match format {
        ConfigFormat::Json => serde_json::from_str(contents)?,
        ConfigFormat::Toml => toml::from_str(contents)?,
    };
    Ok(config)
}

/// Load a configuration file from path and run validation.
///
/// Relative source / destination roots are resolved against `base_dir`
/// (the binary passes the current working directory).
pub fn load_and_validate(path: impl AsRef<Path>, base_dir: &Path) -> Result<ConfigFile> {
    let path = path.as_ref();
    info!(config = ?path, "loading config");
    let raw_config = load_from_path(path)?;
    // Validate on resolved roots so a relative source cannot hide an
    // absolute destination inside it.
    ConfigFile::try_from(raw_config.resolve_relative_to(base_dir))
}
