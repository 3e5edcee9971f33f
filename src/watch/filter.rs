// src/watch/filter.rs

//! Per-mapping eligibility rules: dot-files, exclude, then include.

use crate::config::Mapping;
use crate::errors::Result;
use crate::watch::path_utils::{file_name_str, normalize_separators};
use crate::watch::patterns::{Pattern, PatternList};

/// Compiled include / exclude / cleanup patterns of one mapping.
///
/// Empty include means "everything", empty exclude means "nothing".
#[derive(Debug, Clone)]
pub struct MappingRules {
    include: Option<Pattern>,
    exclude: Option<Pattern>,
    cleanup: PatternList,
}

impl MappingRules {
    pub fn new(include: &str, exclude: &str, cleanup: &[String]) -> Result<Self> {
        Ok(Self {
            include: optional_pattern(include)?,
            exclude: optional_pattern(exclude)?,
            cleanup: PatternList::new(cleanup)?,
        })
    }

    pub fn from_mapping(mapping: &Mapping) -> Result<Self> {
        Self::new(
            &mapping.include,
            &mapping.exclude,
            &mapping.cleanup_patterns,
        )
    }

    /// Whether a file at `path` should be mirrored.
    pub fn should_sync(&self, path: &str) -> bool {
        if is_dot_file(path) {
            return false;
        }
        if let Some(exclude) = &self.exclude {
            if exclude.matches(path) {
                return false;
            }
        }
        match &self.include {
            Some(include) => include.matches(path),
            None => true,
        }
    }

    pub fn cleanup(&self) -> &PatternList {
        &self.cleanup
    }
}

/// True if the file name component of `path` starts with `.`.
pub fn is_dot_file(path: &str) -> bool {
    let path = normalize_separators(path);
    file_name_str(&path).starts_with('.')
}

fn optional_pattern(raw: &str) -> Result<Option<Pattern>> {
    if raw.is_empty() {
        Ok(None)
    } else {
        Pattern::new(raw).map(Some)
    }
}
