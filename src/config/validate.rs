// src/config/validate.rs

use crate::config::model::{ConfigFile, Mapping, RawConfigFile};
use crate::errors::{MirrorError, Result};
use crate::watch::filter::MappingRules;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::MirrorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.mappings))
    }
}

pub fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_mappings(cfg)?;
    for (index, mapping) in cfg.mappings.iter().enumerate() {
        validate_roots(index, mapping)?;
        validate_patterns(index, mapping)?;
    }
    Ok(())
}

fn ensure_has_mappings(cfg: &RawConfigFile) -> Result<()> {
    if cfg.mappings.is_empty() {
        return Err(MirrorError::ConfigError(
            "config must contain at least one mapping".to_string(),
        ));
    }
    Ok(())
}

fn validate_roots(index: usize, mapping: &Mapping) -> Result<()> {
    if mapping.src_root.as_os_str().is_empty() {
        return Err(MirrorError::ConfigError(format!(
            "mapping {index}: `srcRoot` must not be empty"
        )));
    }
    if mapping.dst_root.as_os_str().is_empty() {
        return Err(MirrorError::ConfigError(format!(
            "mapping {index}: `dstRoot` must not be empty"
        )));
    }
    // A destination inside its own source would be mirrored into itself on
    // every cycle.
    if mapping.dst_root.starts_with(&mapping.src_root) {
        return Err(MirrorError::ConfigError(format!(
            "mapping {index}: `dstRoot` {:?} must not be inside `srcRoot` {:?}",
            mapping.dst_root, mapping.src_root
        )));
    }
    Ok(())
}

fn validate_patterns(index: usize, mapping: &Mapping) -> Result<()> {
    MappingRules::from_mapping(mapping).map_err(|err| {
        MirrorError::ConfigError(format!("mapping {index}: {err}"))
    })?;
    Ok(())
}
