// src/config/mod.rs

//! Configuration loading and validation for filemirror.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Load a JSON or TOML config file from disk (`loader.rs`).
//! - Validate mappings and their patterns (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{ConfigFile, Mapping, RawConfigFile};
pub use validate::validate_raw_config;
