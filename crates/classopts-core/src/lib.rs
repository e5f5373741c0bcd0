//! Inheritable per-type options for multiple-inheritance hierarchies.
//!
//! Each type declares two field maps: overrides, visible on that type only,
//! and defaults, inherited by every descendant. Resolving a type merges its
//! parents' default chains with C3 linearization and puts its own defaults
//! at the head. Lookups check the overrides first, then walk the chain.
//!
//! Types must be resolved parents-first; a resolved view is immutable and
//! can be shared across threads.

mod chain;
mod error;
mod field_map;
mod linearize;
mod view;

pub use chain::{ChainLink, LinearizedChain};
pub use error::InconsistentHierarchyError;
pub use field_map::FieldMap;
pub use linearize::linearize;
pub use view::{lookup, lookup_entry, resolve, Entry, Layer, ResolvedView, TypeDecl};

/// Re-exported so callers can build values without naming `serde_json`.
pub use serde_json::Value;
