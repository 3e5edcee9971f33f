// src/engine/report.rs

//! Narrow reporting interface between the engine and whoever displays its
//! progress.
//!
//! The engine never logs file-level outcomes directly; it emits
//! [`MirrorEvent`]s through a [`Reporter`]. Whether an event is shown is the
//! reporter's decision ([`TracingReporter`] leaves it to the subscriber's
//! level filter).

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorEvent {
    /// A missing destination root was created at startup.
    DestinationRootCreated { path: PathBuf },
    FileCopied {
        source: PathBuf,
        destination: PathBuf,
        bytes: u64,
    },
    CopyFailed {
        source: PathBuf,
        destination: PathBuf,
        error: String,
    },
    /// The source vanished between scan and copy.
    SourceFileMissing { source: PathBuf, destination: PathBuf },
    FileDeleted { destination: PathBuf },
    DeleteFailed { destination: PathBuf, error: String },
    /// A mapping's source root does not exist; the mapping was skipped.
    SourceRootMissing { mapping: usize, path: PathBuf },
    CleanupRemoved { path: PathBuf },
    CleanupFailed { path: PathBuf, error: String },
    /// Anything else that went wrong while walking or hashing.
    ScanError { path: PathBuf, error: String },
}

pub trait Reporter: Send + Sync {
    fn report(&self, event: MirrorEvent);
}

/// Reporter that forwards every event to `tracing`.
///
/// Routine file operations go to `debug` (visible with `--verbose`),
/// recoverable failures to `warn`, skipped mappings to `error`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: MirrorEvent) {
        match event {
            MirrorEvent::DestinationRootCreated { path } => {
                info!(path = ?path, "destination root not found; created it");
            }
            MirrorEvent::FileCopied {
                source,
                destination,
                bytes,
            } => {
                debug!(from = ?source, to = ?destination, bytes, "copied");
            }
            MirrorEvent::CopyFailed {
                source,
                destination,
                error,
            } => {
                warn!(from = ?source, to = ?destination, %error, "copy failed");
            }
            MirrorEvent::SourceFileMissing { source, .. } => {
                warn!(path = ?source, "could not open/find source file");
            }
            MirrorEvent::FileDeleted { destination } => {
                debug!(path = ?destination, "deleted");
            }
            MirrorEvent::DeleteFailed { destination, error } => {
                warn!(path = ?destination, %error, "error deleting");
            }
            MirrorEvent::SourceRootMissing { mapping, path } => {
                error!(mapping, path = ?path, "source dir could not be found; skipping mapping");
            }
            MirrorEvent::CleanupRemoved { path } => {
                debug!(path = ?path, "cleaned");
            }
            MirrorEvent::CleanupFailed { path, error } => {
                warn!(path = ?path, %error, "could not delete cleanup dir");
            }
            MirrorEvent::ScanError { path, error } => {
                warn!(path = ?path, %error, "scan error");
            }
        }
    }
}
