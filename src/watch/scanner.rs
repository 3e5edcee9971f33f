// src/watch/scanner.rs

//! Mark phase: walk one mapping's source tree and record every eligible file
//! in the [`WatchRegistry`].

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::config::Mapping;
use crate::engine::report::{MirrorEvent, Reporter};
use crate::errors::{MirrorError, Result};
use crate::fs::FileSystem;
use crate::watch::filter::MappingRules;
use crate::watch::hash::compute_file_hash;
use crate::watch::path_utils::{path_str, rebase};
use crate::watch::registry::{Observation, ObserveOutcome, WatchKey, WatchRegistry};

/// Per-mapping counters for one scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Files that passed the filters and were hashed.
    pub matched: usize,
    pub new: usize,
    pub changed: usize,
    /// Regular files rejected by the filters (dot-files included).
    pub filtered: usize,
    /// Directories or files that could not be read.
    pub errors: usize,
}

/// Walk `mapping.src_root` and mark every matching file live in `registry`.
///
/// Fails with [`MirrorError::SourceNotFound`] if the source root is not a
/// directory; nothing is marked in that case. Unreadable subdirectories and
/// files are reported and skipped, and entries already registered below them
/// are kept alive so a transient read error never deletes mirrored files.
pub fn scan_mapping(
    fs: &dyn FileSystem,
    index: usize,
    mapping: &Mapping,
    rules: &MappingRules,
    registry: &mut WatchRegistry,
    reporter: &dyn Reporter,
) -> Result<ScanStats> {
    let src_root = mapping.src_root.as_path();
    if !fs.is_dir(src_root) {
        return Err(MirrorError::SourceNotFound {
            index,
            path: mapping.src_root.clone(),
        });
    }

    let mut stats = ScanStats::default();
    let mut stack = vec![src_root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let mut children = match fs.read_dir(&dir) {
            Ok(children) => children,
            Err(err) => {
                stats.errors += 1;
                registry.confirm_under(index, &dir);
                reporter.report(MirrorEvent::ScanError {
                    path: dir,
                    error: format!("{err:#}"),
                });
                continue;
            }
        };
        // Reverse-sorted so the stack pops directories in lexical order.
        children.sort_unstable_by(|a, b| b.cmp(a));

        for path in children {
            if fs.is_symlink(&path) && fs.is_dir(&path) {
                // Symlinked directories are not followed; they may loop.
                trace!(path = ?path, "skipping symlinked directory");
            } else if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                visit_file(fs, index, mapping, rules, registry, reporter, &path, &mut stats);
            }
        }
    }

    debug!(
        mapping = index,
        matched = stats.matched,
        new = stats.new,
        changed = stats.changed,
        filtered = stats.filtered,
        errors = stats.errors,
        "scanned mapping"
    );
    Ok(stats)
}

#[allow(clippy::too_many_arguments)]
fn visit_file(
    fs: &dyn FileSystem,
    index: usize,
    mapping: &Mapping,
    rules: &MappingRules,
    registry: &mut WatchRegistry,
    reporter: &dyn Reporter,
    path: &Path,
    stats: &mut ScanStats,
) {
    let Some((relative_path, destination)) = rebase(&mapping.src_root, &mapping.dst_root, path)
    else {
        return;
    };

    if !rules.should_sync(&path_str(path)) {
        trace!(path = ?path, "filtered out");
        stats.filtered += 1;
        return;
    }

    let key = WatchKey::new(index, destination.clone());
    let hash = match compute_file_hash(fs, path) {
        Ok(hash) => hash,
        Err(err) => {
            // Keep a known entry alive with its old digest; an unknown file is
            // picked up by a later cycle once it can be read.
            stats.errors += 1;
            registry.confirm(&key);
            reporter.report(MirrorEvent::ScanError {
                path: path.to_path_buf(),
                error: format!("{err:#}"),
            });
            return;
        }
    };

    let observation = Observation {
        relative_path,
        source: PathBuf::from(path),
        destination,
        modified: fs.modified(path).ok(),
        hash,
    };

    stats.matched += 1;
    match registry.observe(key, observation) {
        ObserveOutcome::New => stats.new += 1,
        ObserveOutcome::Changed => stats.changed += 1,
        ObserveOutcome::Unchanged => {}
    }
}
