//! Hierarchy configuration
//!
//! Loads type hierarchies from TOML files:
//! 1. Declaration keys naming the override and default tables
//! 2. Type entries with their parents and option tables
//! 3. Resolution reports with per-field provenance

mod hierarchy;
mod keys;
mod report;

pub use hierarchy::{toml_to_json, HierarchyFile, SourceInfo, TypeEntry};
pub use keys::{DeclarationKeys, DEFAULT_DEFAULTS_KEY, DEFAULT_OVERRIDES_KEY};
pub use report::{FieldOrigin, ResolvedReport, SCHEMA_ID, SCHEMA_VERSION};

use crate::registry::RegistryError;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
