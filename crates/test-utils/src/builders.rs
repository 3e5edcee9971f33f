#![allow(dead_code)]

use std::path::PathBuf;

use filemirror::config::{ConfigFile, Mapping, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_mapping(mut self, mapping: Mapping) -> Self {
        self.config.mappings.push(mapping);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Mapping`.
pub struct MappingBuilder {
    mapping: Mapping,
}

impl MappingBuilder {
    pub fn new(src_root: impl Into<PathBuf>, dst_root: impl Into<PathBuf>) -> Self {
        Self {
            mapping: Mapping::new(src_root, dst_root),
        }
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.mapping.include = pattern.to_string();
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.mapping.exclude = pattern.to_string();
        self
    }

    pub fn cleanup(mut self, pattern: &str) -> Self {
        self.mapping.cleanup_patterns.push(pattern.to_string());
        self
    }

    pub fn build(self) -> Mapping {
        self.mapping
    }
}
