// src/watch/registry.rs

//! Live watch state carried from one scan cycle to the next.
//!
//! Liveness is tracked with an explicit [`EntryState`]:
//!
//! - scanning marks every observed entry `Fresh` (new) or `Confirmed`
//!   (seen before),
//! - [`WatchRegistry::sweep`] then removes every entry still `Stale` and
//!   re-arms the survivors to `Stale` for the next cycle.
//!
//! An entry therefore survives a sweep only if the scan that preceded it
//! observed the file.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::watch::hash::{detect_change, HashChange};

/// Registry key: (mapping index, destination path).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WatchKey {
    pub mapping: usize,
    pub destination: PathBuf,
}

impl WatchKey {
    pub fn new(mapping: usize, destination: impl Into<PathBuf>) -> Self {
        Self {
            mapping,
            destination: destination.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// First observed during the current cycle.
    Fresh,
    /// Observed again during the current cycle.
    Confirmed,
    /// Not (yet) observed since the last sweep.
    Stale,
}

/// Tracked state for one source file that currently matches its mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    /// Path relative to the mapping's source root.
    pub relative_path: PathBuf,
    /// Path of the source file as walked.
    pub source: PathBuf,
    pub destination: PathBuf,
    pub modified: Option<SystemTime>,
    pub hash: String,
    /// Destination copy is stale relative to `hash`.
    pub dirty: bool,
    pub state: EntryState,
}

/// What a scan saw for one file.
#[derive(Debug, Clone)]
pub struct Observation {
    pub relative_path: PathBuf,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub modified: Option<SystemTime>,
    pub hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveOutcome {
    New,
    Changed,
    Unchanged,
}

#[derive(Debug, Default, Clone)]
pub struct WatchRegistry {
    entries: BTreeMap<WatchKey, WatchEntry>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &WatchKey) -> Option<&WatchEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &WatchKey) -> Option<&mut WatchEntry> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &WatchKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WatchKey, &WatchEntry)> {
        self.entries.iter()
    }

    /// Record a scan observation, creating the entry if needed.
    ///
    /// The entry is marked live for this cycle and flagged dirty if its
    /// digest differs from the stored one.
    pub fn observe(&mut self, key: WatchKey, observation: Observation) -> ObserveOutcome {
        let Observation {
            relative_path,
            source,
            destination,
            modified,
            hash,
        } = observation;

        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.state = EntryState::Confirmed;
                entry.modified = modified;
                entry.relative_path = relative_path;
                entry.source = source;
                match detect_change(Some(entry.hash.as_str()), hash) {
                    HashChange::Unchanged => ObserveOutcome::Unchanged,
                    HashChange::Changed(new_hash) => {
                        entry.hash = new_hash;
                        entry.dirty = true;
                        ObserveOutcome::Changed
                    }
                }
            }
            None => {
                self.entries.insert(
                    key,
                    WatchEntry {
                        relative_path,
                        source,
                        destination,
                        modified,
                        hash,
                        dirty: true,
                        state: EntryState::Fresh,
                    },
                );
                ObserveOutcome::New
            }
        }
    }

    /// Mark an existing entry live without touching its digest.
    ///
    /// Returns false if there is no such entry.
    pub fn confirm(&mut self, key: &WatchKey) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                if entry.state == EntryState::Stale {
                    entry.state = EntryState::Confirmed;
                }
                true
            }
            None => false,
        }
    }

    /// Keep every entry of `mapping` whose source lies under `dir` alive for
    /// this cycle. Used when that part of the tree could not be scanned.
    pub fn confirm_under(&mut self, mapping: usize, dir: &Path) -> usize {
        let mut confirmed = 0;
        for (key, entry) in self.entries.iter_mut() {
            if key.mapping == mapping
                && entry.source.starts_with(dir)
                && entry.state == EntryState::Stale
            {
                entry.state = EntryState::Confirmed;
                confirmed += 1;
            }
        }
        confirmed
    }

    /// Remove every entry not observed since the previous sweep and re-arm
    /// the survivors. Returns the removed entries in key order.
    pub fn sweep(&mut self) -> Vec<(WatchKey, WatchEntry)> {
        let (stale, live): (BTreeMap<_, _>, BTreeMap<_, _>) =
            std::mem::take(&mut self.entries)
                .into_iter()
                .partition(|(_, entry)| entry.state == EntryState::Stale);

        self.entries = live;
        for entry in self.entries.values_mut() {
            entry.state = EntryState::Stale;
        }
        stale.into_iter().collect()
    }

    /// Keys of all entries whose destination needs a copy, in key order.
    pub fn dirty_keys(&self) -> Vec<WatchKey> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.dirty)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Flag every entry writing to `destination` dirty so the next sync
    /// rewrites it from a live source. Returns how many were flagged.
    pub fn mark_destination_dirty(&mut self, destination: &Path) -> usize {
        let mut marked = 0;
        for entry in self.entries.values_mut() {
            if entry.destination == destination {
                entry.dirty = true;
                marked += 1;
            }
        }
        marked
    }

    /// Destination paths claimed by any entry currently in the registry.
    pub fn destinations(&self) -> HashSet<&Path> {
        self.entries
            .values()
            .map(|entry| entry.destination.as_path())
            .collect()
    }
}
