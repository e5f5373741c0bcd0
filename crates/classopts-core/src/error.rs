//! Error types for hierarchy resolution.

use serde::{Deserialize, Serialize};

/// The declared parent orders cannot be reconciled into one ancestor order.
///
/// Raised only by linearization. Field conflicts are never errors; they are
/// settled by precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error(
    "inconsistent hierarchy for '{}': cannot order {}",
    .type_name,
    .unresolved.join(", ")
)]
pub struct InconsistentHierarchyError {
    /// Type whose chain was being built.
    pub type_name: String,
    /// Types left in the merge when no candidate was eligible, in first-seen order.
    pub unresolved: Vec<String>,
}

impl InconsistentHierarchyError {
    pub fn new(type_name: impl Into<String>, unresolved: Vec<String>) -> Self {
        Self {
            type_name: type_name.into(),
            unresolved,
        }
    }
}
