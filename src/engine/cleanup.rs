// src/engine/cleanup.rs

//! Startup sweep of destination trees: recursively delete every directory
//! matching one of its mapping's cleanup patterns.
//!
//! This pass is independent of the watch registry.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::engine::report::{MirrorEvent, Reporter};
use crate::engine::CompiledMapping;
use crate::fs::FileSystem;
use crate::watch::path_utils::path_str;
use crate::watch::patterns::PatternList;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupStats {
    pub queued: usize,
    pub removed: usize,
    pub failed: usize,
}

/// Walk `dst_root` and return every directory below it matching one of
/// `patterns`.
///
/// Patterns see the path relative to `dst_root`, so names above the root
/// never qualify and the root itself is never queued. A matching directory
/// is not descended into, and symlinked directories are skipped.
pub fn collect_cleanup_dirs(
    fs: &dyn FileSystem,
    dst_root: &Path,
    patterns: &PatternList,
    reporter: &dyn Reporter,
) -> Vec<PathBuf> {
    let mut queued = Vec::new();
    if patterns.is_empty() || !fs.is_dir(dst_root) {
        return queued;
    }

    let mut stack = vec![dst_root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let relative = dir.strip_prefix(dst_root).map(path_str).unwrap_or_default();
        if !relative.is_empty() {
            if let Some(pattern) = patterns.first_match(&relative) {
                debug!(path = ?dir, pattern = pattern.as_str(), "queued for cleanup");
                queued.push(dir);
                continue;
            }
        }

        match fs.read_dir(&dir) {
            Ok(mut children) => {
                children.sort_unstable_by(|a, b| b.cmp(a));
                stack.extend(
                    children
                        .into_iter()
                        .filter(|child| fs.is_dir(child) && !fs.is_symlink(child)),
                );
            }
            Err(err) => reporter.report(MirrorEvent::ScanError {
                path: dir,
                error: format!("{err:#}"),
            }),
        }
    }

    queued
}

/// Collect cleanup directories for every mapping, then delete them.
///
/// Directories nested inside another queued directory (e.g. from mappings
/// with overlapping destinations) are removed along with it and not queued
/// twice. A failed removal is reported and the remaining ones still run.
pub fn run_cleanup(
    fs: &dyn FileSystem,
    mappings: &[CompiledMapping],
    reporter: &dyn Reporter,
) -> CleanupStats {
    let mut queue: Vec<PathBuf> = mappings
        .iter()
        .flat_map(|m| collect_cleanup_dirs(fs, &m.mapping.dst_root, m.rules.cleanup(), reporter))
        .collect();

    queue.sort();
    queue.dedup();
    let mut roots: Vec<PathBuf> = Vec::with_capacity(queue.len());
    for dir in queue {
        if !roots.iter().any(|root| dir.starts_with(root)) {
            roots.push(dir);
        }
    }

    let mut stats = CleanupStats {
        queued: roots.len(),
        ..CleanupStats::default()
    };

    for dir in roots {
        match fs.remove_dir_all(&dir) {
            Ok(()) => {
                stats.removed += 1;
                reporter.report(MirrorEvent::CleanupRemoved { path: dir });
            }
            Err(err) => {
                stats.failed += 1;
                reporter.report(MirrorEvent::CleanupFailed {
                    path: dir,
                    error: format!("{err:#}"),
                });
            }
        }
    }

    debug!(
        queued = stats.queued,
        removed = stats.removed,
        failed = stats.failed,
        "cleanup finished"
    );
    stats
}
