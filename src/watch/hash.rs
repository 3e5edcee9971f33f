use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use blake3::Hasher;
use tracing::trace;

use crate::fs::FileSystem;

/// Compute the content digest of a single file.
///
/// The digest is BLAKE3 over the full contents, rendered as lowercase hex.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file = fs
        .open_read(path)
        .with_context(|| format!("opening file for hashing: {:?}", path))?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("reading file for hashing: {:?}", path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let hash = hasher.finalize().to_hex().to_string();
    trace!(path = ?path, hash = %hash, "hashed file");
    Ok(hash)
}

/// Outcome of comparing a fresh digest with the one stored on a watch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashChange {
    /// Same digest as last time.
    Unchanged,
    /// First digest for this entry, or the content differs.
    Changed(String),
}

/// Compare `new_hash` against the previously stored digest.
pub fn detect_change(previous: Option<&str>, new_hash: String) -> HashChange {
    match previous {
        Some(old) if old == new_hash => HashChange::Unchanged,
        _ => HashChange::Changed(new_hash),
    }
}
