// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration as read from disk, before validation.
///
/// JSON form:
///
/// ```json
/// {
///   "mappings": [
///     {
///       "srcRoot": "src/main/resources",
///       "dstRoot": "build/classes",
///       "files": "**/*.xml",
///       "ignored": "",
///       "cleanupPatterns": ["**/test"]
///     }
///   ]
/// }
/// ```
///
/// The TOML form uses `[[mappings]]` tables with the same keys (snake_case
/// aliases such as `src_root` are accepted as well).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default, alias = "Mappings")]
    pub mappings: Vec<Mapping>,
}

/// One source-root-to-destination-root unit with its own filters.
///
/// Mappings are identified by their position in [`ConfigFile::mappings`].
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Mapping {
    #[serde(rename = "srcRoot", alias = "src_root")]
    pub src_root: PathBuf,

    #[serde(rename = "dstRoot", alias = "dst_root")]
    pub dst_root: PathBuf,

    /// Include pattern; empty means every file.
    #[serde(default, rename = "files", alias = "include")]
    pub include: String,

    /// Exclude pattern; empty means nothing is excluded.
    #[serde(default, rename = "ignored", alias = "exclude")]
    pub exclude: String,

    /// Patterns selecting destination directories to wipe on startup.
    #[serde(default, rename = "cleanupPatterns", alias = "cleanup_patterns")]
    pub cleanup_patterns: Vec<String>,
}

impl RawConfigFile {
    /// Join relative source / destination roots onto `base`. Empty roots are
    /// left empty so validation still rejects them.
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        for mapping in self.mappings.iter_mut() {
            mapping.resolve_relative_to(base);
        }
        self
    }
}

impl Mapping {
    fn resolve_relative_to(&mut self, base: &Path) {
        for root in [&mut self.src_root, &mut self.dst_root] {
            if root.is_relative() && !root.as_os_str().is_empty() {
                *root = base.join(&*root);
            }
        }
    }

    pub fn new(src_root: impl Into<PathBuf>, dst_root: impl Into<PathBuf>) -> Self {
        Self {
            src_root: src_root.into(),
            dst_root: dst_root.into(),
            include: String::new(),
            exclude: String::new(),
            cleanup_patterns: Vec::new(),
        }
    }
}

/// Validated configuration. Obtain one via `ConfigFile::try_from(raw)` or
/// [`crate::config::load_and_validate`].
#[derive(Debug, Clone)]
pub struct ConfigFile {
    mappings: Vec<Mapping>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(mappings: Vec<Mapping>) -> Self {
        Self { mappings }
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn into_mappings(self) -> Vec<Mapping> {
        self.mappings
    }
}
