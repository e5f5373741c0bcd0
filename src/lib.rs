//! classopts - inheritable per-type options
//!
//! Resolves option tables declared on the types of a multiple-inheritance
//! hierarchy. Defaults are inherited along a C3-linearized chain; overrides
//! apply to the declaring type only. The resolution core lives in
//! `classopts-core`; this crate adds a registry, TOML hierarchy files and
//! provenance reports.

pub mod config;
pub mod logging;
pub mod registry;

pub use classopts_core::{
    linearize, lookup, lookup_entry, resolve, ChainLink, Entry, FieldMap,
    InconsistentHierarchyError, Layer, LinearizedChain, ResolvedView, TypeDecl, Value,
};
pub use config::{ConfigError, DeclarationKeys, HierarchyFile, ResolvedReport, SourceInfo};
pub use registry::{RegistryError, TypeRegistry};
