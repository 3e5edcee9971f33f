// src/watch/path_utils.rs

//! Utility functions for path handling in the scanner and cleanup sweep.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Replace Windows-style `\` separators with `/` so patterns written with
/// forward slashes match on every platform.
pub fn normalize_separators(path: &str) -> Cow<'_, str> {
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}

/// Last `/`-separated component of an already normalized path.
pub fn file_name_str(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Lossy, `/`-separated string form of a path, as fed to the pattern matcher.
pub fn path_str(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy()).into_owned()
}

/// Rebase `path` (somewhere below `src_root`) onto `dst_root`.
///
/// Returns the path relative to `src_root` together with the destination
/// path, or `None` if `path` does not live under `src_root`.
pub fn rebase(src_root: &Path, dst_root: &Path, path: &Path) -> Option<(PathBuf, PathBuf)> {
    let rel = path.strip_prefix(src_root).ok()?;
    Some((rel.to_path_buf(), dst_root.join(rel)))
}
