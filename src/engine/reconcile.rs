// src/engine/reconcile.rs

//! Sweep phase: drop registry entries whose source was not seen by the scan
//! that just finished, and delete their mirrored files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::engine::report::{MirrorEvent, Reporter};
use crate::fs::FileSystem;
use crate::watch::registry::WatchRegistry;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    /// Entries removed from the registry.
    pub removed: usize,
    pub deleted: usize,
    pub delete_failed: usize,
}

/// Run the sweep over `registry`.
///
/// Must only be called after every mapping has been scanned for this cycle.
/// Deletion is best-effort: a failure is reported and the sweep moves on.
/// A destination that was never written is left alone. One still claimed by
/// a live entry of another mapping is kept, and its claimants are flagged
/// dirty so the surviving source is copied over it.
pub fn reconcile(
    fs: &dyn FileSystem,
    registry: &mut WatchRegistry,
    reporter: &dyn Reporter,
) -> SweepStats {
    let removed = registry.sweep();
    let mut stats = SweepStats {
        removed: removed.len(),
        ..SweepStats::default()
    };
    if removed.is_empty() {
        return stats;
    }

    let claimed: HashSet<PathBuf> = registry
        .destinations()
        .into_iter()
        .map(Path::to_path_buf)
        .collect();
    for (key, entry) in removed {
        if claimed.contains(&entry.destination) {
            // The file may still hold the vanished source's bytes.
            let marked = registry.mark_destination_dirty(&entry.destination);
            trace!(mapping = key.mapping, path = ?entry.destination, marked, "destination still claimed; re-syncing");
            continue;
        }
        if !fs.exists(&entry.destination) {
            trace!(path = ?entry.destination, "destination never written; nothing to delete");
            continue;
        }
        match fs.remove_file(&entry.destination) {
            Ok(()) => {
                stats.deleted += 1;
                reporter.report(MirrorEvent::FileDeleted {
                    destination: entry.destination,
                });
            }
            Err(err) => {
                stats.delete_failed += 1;
                reporter.report(MirrorEvent::DeleteFailed {
                    destination: entry.destination,
                    error: format!("{err:#}"),
                });
            }
        }
    }

    debug!(
        removed = stats.removed,
        deleted = stats.deleted,
        delete_failed = stats.delete_failed,
        "sweep finished"
    );
    stats
}
