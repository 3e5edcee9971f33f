// src/watch/mod.rs

//! Scanning and change detection.
//!
//! This module is responsible for:
//! - Compiling include / exclude / cleanup patterns per mapping.
//! - Walking source trees and recording matching files in the
//!   [`WatchRegistry`] (the mark phase).
//! - Content hashing, so unchanged files are never copied twice.
//!
//! It does **not** touch destination trees; copying, deleting and cleanup
//! live in [`crate::engine`].

pub mod filter;
pub mod hash;
pub mod path_utils;
pub mod patterns;
pub mod registry;
pub mod scanner;

pub use filter::{is_dot_file, MappingRules};
pub use hash::compute_file_hash;
pub use patterns::{matches, Pattern, PatternList, Segment};
pub use registry::{EntryState, WatchEntry, WatchKey, WatchRegistry};
pub use scanner::{scan_mapping, ScanStats};
