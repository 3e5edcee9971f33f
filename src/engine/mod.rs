// src/engine/mod.rs

//! Reconciliation engine for filemirror.
//!
//! This module ties together:
//! - the mark phase (scanning, in [`crate::watch`])
//! - the sweep phase that deletes orphaned mirrors ([`reconcile`])
//! - the copy phase ([`sync`])
//! - the startup cleanup sweep ([`cleanup`])
//! - the event reporting interface ([`report`])
//!
//! The synchronous engine lives in [`core`]; the async poll loop around it is
//! implemented in [`runtime`].

use crate::config::Mapping;
use crate::errors::Result;
use crate::watch::filter::MappingRules;
use crate::watch::scanner::ScanStats;

pub mod cleanup;
pub mod core;
pub mod reconcile;
pub mod report;
pub mod runtime;
pub mod sync;

pub use self::core::MirrorEngine;
pub use cleanup::CleanupStats;
pub use reconcile::SweepStats;
pub use report::{MirrorEvent, Reporter, TracingReporter};
pub use runtime::{Runtime, RuntimeOptions};
pub use sync::SyncStats;

/// A mapping together with its compiled patterns.
#[derive(Debug, Clone)]
pub struct CompiledMapping {
    pub mapping: Mapping,
    pub rules: MappingRules,
}

impl CompiledMapping {
    pub fn new(mapping: Mapping) -> Result<Self> {
        let rules = MappingRules::from_mapping(&mapping)?;
        Ok(Self { mapping, rules })
    }
}

/// Result of scanning one mapping during a cycle.
#[derive(Debug)]
pub struct MappingOutcome {
    pub index: usize,
    pub result: Result<ScanStats>,
}

/// Everything one call to [`MirrorEngine::run_cycle`] did.
#[derive(Debug)]
pub struct CycleSummary {
    /// 1-based cycle number.
    pub cycle: u64,
    pub mappings: Vec<MappingOutcome>,
    pub sweep: SweepStats,
    pub sync: SyncStats,
}

impl CycleSummary {
    /// Mappings whose scan failed (e.g. missing source root).
    pub fn failed_mappings(&self) -> impl Iterator<Item = &MappingOutcome> {
        self.mappings.iter().filter(|m| m.result.is_err())
    }

    /// True if nothing was copied or deleted.
    pub fn is_idle(&self) -> bool {
        self.sync.copied == 0 && self.sweep.deleted == 0
    }
}
