//! Shared types, error model, and configuration for hidecode.
//!
//! This crate is the foundation depended on by the filter crate.
//! It provides:
//! - [`HideCodeError`]: the unified error type
//! - The notebook data model ([`Notebook`], [`Cell`], [`CellType`], [`Resources`])
//! - Configuration ([`AppConfig`], [`HideCodeConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, HideCodeConfig, config_dir, config_file_path, init_config, init_config_at,
    load_config, load_config_from,
};
pub use error::{HideCodeError, Result};
pub use types::{Cell, CellType, NBFORMAT_MAJOR, Notebook, Resources, is_truthy};
