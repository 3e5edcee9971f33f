// src/engine/core.rs

//! Synchronous reconciliation engine.
//!
//! [`MirrorEngine`] owns everything a cycle needs: the compiled mappings,
//! the watch registry, the filesystem and the reporter. One call to
//! [`MirrorEngine::run_cycle`] performs, in order:
//!
//! 1. mark: scan every mapping's source tree,
//! 2. sweep: drop entries not seen by that scan and delete their mirrors,
//! 3. sync: copy every dirty entry.
//!
//! Nothing here is async; the tokio shell in [`crate::engine::runtime`] only
//! decides when to call it.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::ConfigFile;
use crate::engine::cleanup::{run_cleanup, CleanupStats};
use crate::engine::reconcile::reconcile;
use crate::engine::report::{MirrorEvent, Reporter};
use crate::engine::sync::sync_dirty;
use crate::engine::{CompiledMapping, CycleSummary, MappingOutcome};
use crate::errors::{MirrorError, Result};
use crate::fs::FileSystem;
use crate::watch::registry::WatchRegistry;
use crate::watch::scanner::scan_mapping;

pub struct MirrorEngine {
    fs: Arc<dyn FileSystem>,
    reporter: Arc<dyn Reporter>,
    mappings: Vec<CompiledMapping>,
    registry: WatchRegistry,
    cycles: u64,
}

impl fmt::Debug for MirrorEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirrorEngine")
            .field("mappings", &self.mappings.len())
            .field("entries", &self.registry.len())
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

impl MirrorEngine {
    pub fn new(
        config: &ConfigFile,
        fs: Arc<dyn FileSystem>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self> {
        let mappings = config
            .mappings()
            .iter()
            .cloned()
            .map(CompiledMapping::new)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fs,
            reporter,
            mappings,
            registry: WatchRegistry::new(),
            cycles: 0,
        })
    }

    pub fn mappings(&self) -> &[CompiledMapping] {
        &self.mappings
    }

    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    /// Number of completed cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Create missing destination roots. Returns how many were created.
    pub fn prepare_destinations(&self) -> usize {
        let mut created = 0;
        for compiled in &self.mappings {
            let dst_root = &compiled.mapping.dst_root;
            if self.fs.exists(dst_root) {
                continue;
            }
            match self.fs.create_dir_all(dst_root) {
                Ok(()) => {
                    created += 1;
                    self.reporter.report(MirrorEvent::DestinationRootCreated {
                        path: dst_root.clone(),
                    });
                }
                Err(err) => self.reporter.report(MirrorEvent::ScanError {
                    path: dst_root.clone(),
                    error: format!("{err:#}"),
                }),
            }
        }
        created
    }

    /// Remove destination directories matching each mapping's cleanup
    /// patterns.
    pub fn cleanup(&self) -> CleanupStats {
        run_cleanup(self.fs.as_ref(), &self.mappings, self.reporter.as_ref())
    }

    /// Run one scan / sweep / sync cycle.
    ///
    /// A mapping whose source root is missing is reported and skipped; its
    /// registered entries are kept and the other mappings proceed normally.
    pub fn run_cycle(&mut self) -> CycleSummary {
        let fs = self.fs.as_ref();
        let reporter = self.reporter.as_ref();

        let mut outcomes = Vec::with_capacity(self.mappings.len());
        for (index, compiled) in self.mappings.iter().enumerate() {
            let result = scan_mapping(
                fs,
                index,
                &compiled.mapping,
                &compiled.rules,
                &mut self.registry,
                reporter,
            );
            if let Err(MirrorError::SourceNotFound { path, .. }) = &result {
                self.registry.confirm_under(index, path);
                reporter.report(MirrorEvent::SourceRootMissing {
                    mapping: index,
                    path: path.clone(),
                });
            }
            outcomes.push(MappingOutcome { index, result });
        }

        let sweep = reconcile(fs, &mut self.registry, reporter);
        let sync = sync_dirty(fs, &mut self.registry, reporter);

        self.cycles += 1;
        let summary = CycleSummary {
            cycle: self.cycles,
            mappings: outcomes,
            sweep,
            sync,
        };
        debug!(
            cycle = summary.cycle,
            entries = self.registry.len(),
            copied = summary.sync.copied,
            deleted = summary.sweep.deleted,
            failed_mappings = summary.failed_mappings().count(),
            "cycle complete"
        );
        summary
    }
}
