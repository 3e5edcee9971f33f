// src/watch/patterns.rs

//! Structural matching for include / exclude / cleanup patterns.
//!
//! A pattern is split on `/` and every segment is tagged:
//!
//! - `**`, `**foo`      → [`Segment::DirectorySpan`]
//! - `*.css`, `*.*`     → [`Segment::FileSuffix`]
//! - anything else      → [`Segment::Literal`]
//!
//! The tagged segments decide once, at construction time, how paths are
//! matched:
//!
//! - If there is at least one literal segment, the literal segments joined by
//!   `/` must occur somewhere in the path. When the last segment is a file
//!   suffix, the file name must additionally glob-match it.
//! - Else, a multi-segment pattern starting with `**` only matches the file
//!   name against its last segment.
//! - Everything else is a plain shell glob over the whole path.
//!
//! In every glob `*` also matches `/`, so `*.css` matches a file in any
//! directory. Backslashes in paths are treated as `/`.

use std::fmt;

use globset::{GlobBuilder, GlobMatcher};

use crate::errors::{MirrorError, Result};
use crate::watch::path_utils::{file_name_str, normalize_separators};

/// One `/`-separated piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A plain directory or file name, e.g. `modules` or `config.json`.
    Literal(String),
    /// `**`: any number of directories at this position.
    DirectorySpan,
    /// `*.<suffix>`: any file name ending in `.<suffix>`.
    FileSuffix(String),
}

impl Segment {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("**") {
            Segment::DirectorySpan
        } else if let Some(suffix) = raw.strip_prefix("*.") {
            Segment::FileSuffix(suffix.to_string())
        } else {
            Segment::Literal(raw.to_string())
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }
}

#[derive(Clone)]
enum Strategy {
    /// The empty pattern.
    Never,
    /// Substring match on the literal part, optionally followed by a file
    /// name glob.
    Contains {
        needle: String,
        file_glob: Option<GlobMatcher>,
    },
    /// Glob over the file name component only.
    FileName(GlobMatcher),
    /// Glob over the whole path.
    FullPath(GlobMatcher),
}

/// A compiled pattern.
#[derive(Clone)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
    strategy: Strategy,
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("raw", &self.raw)
            .field("segments", &self.segments)
            .finish_non_exhaustive()
    }
}

impl Pattern {
    /// Parse and compile a pattern.
    ///
    /// Fails only if a piece that is evaluated as a shell glob is not a valid
    /// glob.
    pub fn new(raw: &str) -> Result<Self> {
        let segments: Vec<Segment> = raw.split('/').map(Segment::parse).collect();
        let last_raw = raw.rsplit('/').next().unwrap_or(raw);

        let strategy = if raw.is_empty() {
            Strategy::Never
        } else if segments.len() > 1 {
            let literals: Vec<&str> = segments
                .iter()
                .filter_map(|segment| match segment {
                    Segment::Literal(name) => Some(name.as_str()),
                    _ => None,
                })
                .collect();

            if !literals.is_empty() {
                let file_glob = match segments.last() {
                    Some(Segment::FileSuffix(_)) => Some(compile_glob(raw, last_raw)?),
                    _ => None,
                };
                Strategy::Contains {
                    needle: literals.join("/"),
                    file_glob,
                }
            } else if raw.starts_with("**") {
                Strategy::FileName(compile_glob(raw, last_raw)?)
            } else {
                Strategy::FullPath(compile_glob(raw, raw)?)
            }
        } else {
            Strategy::FullPath(compile_glob(raw, raw)?)
        };

        Ok(Self {
            raw: raw.to_string(),
            segments,
            strategy,
        })
    }

    /// The pattern text as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True if at least one segment is a plain (non-wildcard) segment.
    pub fn has_literal_segments(&self) -> bool {
        self.segments.iter().any(Segment::is_literal)
    }

    /// The literal segments joined by `/`, i.e. the part of the pattern that
    /// must appear verbatim in a matching path.
    pub fn literal_portion(&self) -> String {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Literal(name) => Some(name.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn matches(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let path = normalize_separators(path);

        match &self.strategy {
            Strategy::Never => false,
            Strategy::Contains { needle, file_glob } => {
                if !path.contains(needle.as_str()) {
                    return false;
                }
                match file_glob {
                    Some(glob) => glob.is_match(file_name_str(&path)),
                    None => true,
                }
            }
            Strategy::FileName(glob) => glob.is_match(file_name_str(&path)),
            Strategy::FullPath(glob) => glob.is_match(&*path),
        }
    }
}

/// A list of patterns where any single match counts (cleanup patterns).
///
/// Empty entries are dropped on construction.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        let patterns = raw
            .iter()
            .map(AsRef::as_ref)
            .filter(|p| !p.is_empty())
            .map(Pattern::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// The first pattern matching `path`, if any.
    pub fn first_match(&self, path: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.matches(path))
    }

    pub fn matches_any(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }
}

/// One-shot convenience: compile `pattern` and match it against `path`.
///
/// An invalid pattern never matches.
pub fn matches(pattern: &str, path: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(path))
        .unwrap_or(false)
}

/// Plain shell-style glob comparison of `pattern` against the whole `path`
/// (with `*` crossing `/`). Invalid globs never match.
pub fn shell_glob_match(pattern: &str, path: &str) -> bool {
    if pattern.is_empty() || path.is_empty() {
        return false;
    }
    compile_glob(pattern, pattern)
        .map(|glob| glob.is_match(&*normalize_separators(path)))
        .unwrap_or(false)
}

fn compile_glob(pattern: &str, glob: &str) -> Result<GlobMatcher> {
    let compiled = GlobBuilder::new(glob)
        .literal_separator(false)
        .backslash_escape(false)
        .build()
        .map_err(|source| MirrorError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(compiled.compile_matcher())
}
