//! Linearized default chains.

use crate::field_map::FieldMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// One type's contribution to a default chain.
///
/// Identity within a chain is the link allocation, not the owner name; two
/// distinct types sharing a name are different ancestors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainLink {
    pub owner: String,
    pub defaults: FieldMap,
}

impl ChainLink {
    pub fn new(owner: impl Into<String>, defaults: FieldMap) -> Self {
        Self {
            owner: owner.into(),
            defaults,
        }
    }
}

/// Ordered default ancestry of one type, most specific first.
///
/// Links are shared with the parent chains they came from; a chain is never
/// modified after it is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinearizedChain(Vec<Arc<ChainLink>>);

impl LinearizedChain {
    pub(crate) fn from_links(links: Vec<Arc<ChainLink>>) -> Self {
        Self(links)
    }

    pub fn links(&self) -> &[Arc<ChainLink>] {
        &self.0
    }

    /// The link of the type that owns this chain.
    pub fn head(&self) -> Option<&Arc<ChainLink>> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Owner names in chain order.
    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|link| link.owner.as_str())
    }

    /// First link declaring `field`, walking the chain in order.
    pub fn find(&self, field: &str) -> Option<(&ChainLink, &Value)> {
        self.0
            .iter()
            .find_map(|link| link.defaults.get(field).map(|value| (&**link, value)))
    }
}
