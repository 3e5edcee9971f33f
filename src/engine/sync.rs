// src/engine/sync.rs

//! Copy phase: bring every dirty destination up to date.

use tracing::debug;

use crate::engine::report::{MirrorEvent, Reporter};
use crate::fs::FileSystem;
use crate::watch::registry::{WatchEntry, WatchRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing to do; the destination is current.
    Clean,
    Copied(u64),
    /// Source disappeared after the scan; the entry stays dirty.
    SourceMissing,
    /// Copy failed; the entry stays dirty and is retried next cycle.
    Failed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub copied: usize,
    pub bytes: u64,
    pub missing: usize,
    pub failed: usize,
}

/// Copy a single entry if it is dirty.
///
/// Parent directories of the destination are created as needed and the
/// destination is overwritten unconditionally. The dirty flag is cleared
/// only after a successful copy.
pub fn sync_entry(fs: &dyn FileSystem, entry: &mut WatchEntry, reporter: &dyn Reporter) -> SyncOutcome {
    if !entry.dirty {
        return SyncOutcome::Clean;
    }

    if !fs.exists(&entry.source) {
        reporter.report(MirrorEvent::SourceFileMissing {
            source: entry.source.clone(),
            destination: entry.destination.clone(),
        });
        return SyncOutcome::SourceMissing;
    }

    let copy_result = match entry.destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs.create_dir_all(parent),
        _ => Ok(()),
    }
    .and_then(|()| fs.copy(&entry.source, &entry.destination));

    match copy_result {
        Ok(bytes) => {
            entry.dirty = false;
            reporter.report(MirrorEvent::FileCopied {
                source: entry.source.clone(),
                destination: entry.destination.clone(),
                bytes,
            });
            SyncOutcome::Copied(bytes)
        }
        Err(err) => {
            reporter.report(MirrorEvent::CopyFailed {
                source: entry.source.clone(),
                destination: entry.destination.clone(),
                error: format!("{err:#}"),
            });
            SyncOutcome::Failed
        }
    }
}

/// Copy every dirty entry in registry key order.
pub fn sync_dirty(
    fs: &dyn FileSystem,
    registry: &mut WatchRegistry,
    reporter: &dyn Reporter,
) -> SyncStats {
    let mut stats = SyncStats::default();

    for key in registry.dirty_keys() {
        let Some(entry) = registry.get_mut(&key) else {
            continue;
        };
        match sync_entry(fs, entry, reporter) {
            SyncOutcome::Clean => {}
            SyncOutcome::Copied(bytes) => {
                stats.copied += 1;
                stats.bytes += bytes;
            }
            SyncOutcome::SourceMissing => stats.missing += 1,
            SyncOutcome::Failed => stats.failed += 1,
        }
    }

    if stats != SyncStats::default() {
        debug!(
            copied = stats.copied,
            bytes = stats.bytes,
            missing = stats.missing,
            failed = stats.failed,
            "sync pass finished"
        );
    }
    stats
}
