//! Resolved views: a type's override layer on top of its default chain.

use crate::chain::{ChainLink, LinearizedChain};
use crate::error::InconsistentHierarchyError;
use crate::field_map::FieldMap;
use crate::linearize::linearize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// What a type declares about itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    /// Values visible on this exact type only.
    pub overrides: Option<FieldMap>,
    /// Values inherited by every descendant.
    pub defaults: Option<FieldMap>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_overrides(mut self, overrides: impl Into<FieldMap>) -> Self {
        self.overrides = Some(overrides.into());
        self
    }

    pub fn with_defaults(mut self, defaults: impl Into<FieldMap>) -> Self {
        self.defaults = Some(defaults.into());
        self
    }
}

/// Layer a looked-up value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Override,
    Default,
}

/// A found value together with where it was declared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Entry<'a> {
    pub value: &'a Value,
    pub layer: Layer,
    /// Type that declared the value.
    pub owner: &'a str,
}

/// A type's final, queryable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedView {
    name: String,
    overrides: FieldMap,
    chain: LinearizedChain,
}

impl ResolvedView {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn overrides(&self) -> &FieldMap {
        &self.overrides
    }

    pub fn chain(&self) -> &LinearizedChain {
        &self.chain
    }

    /// Linearized type order of the default chain, starting with this type.
    pub fn mro(&self) -> Vec<&str> {
        self.chain.owners().collect()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entry(field).map(|entry| entry.value)
    }

    /// Look up `field`, reporting the layer and type that supplied it.
    pub fn entry(&self, field: &str) -> Option<Entry<'_>> {
        if let Some(value) = self.overrides.get(field) {
            return Some(Entry {
                value,
                layer: Layer::Override,
                owner: &self.name,
            });
        }
        self.chain.find(field).map(|(link, value)| Entry {
            value,
            layer: Layer::Default,
            owner: &link.owner,
        })
    }

    /// Every visible field name, sorted.
    pub fn fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .overrides
            .names()
            .chain(self.chain.links().iter().flat_map(|link| link.defaults.names()))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Flatten into a single map holding the value each field resolves to.
    pub fn materialize(&self) -> FieldMap {
        self.fields()
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field.to_string(), value.clone())))
            .collect()
    }
}

/// Resolve a type from its declaration and its parents' views.
///
/// `parents` must be in declaration order. Undeclared override or default
/// maps count as empty.
pub fn resolve(
    decl: &TypeDecl,
    parents: &[&ResolvedView],
) -> Result<ResolvedView, InconsistentHierarchyError> {
    let parent_chains: Vec<&LinearizedChain> = parents.iter().map(|view| &view.chain).collect();
    let head = ChainLink::new(decl.name.clone(), decl.defaults.clone().unwrap_or_default());
    let chain = linearize(head, &parent_chains)?;

    debug!(
        type_name = %decl.name,
        parents = parents.len(),
        chain_len = chain.len(),
        "resolved type"
    );

    Ok(ResolvedView {
        name: decl.name.clone(),
        overrides: decl.overrides.clone().unwrap_or_default(),
        chain,
    })
}

/// Value of `field` on `view`, or `None` when no layer declares it.
///
/// A field declared as JSON `null` is found and returned as `Some(Value::Null)`.
pub fn lookup<'a>(view: &'a ResolvedView, field: &str) -> Option<&'a Value> {
    view.get(field)
}

/// Like [`lookup`], also naming the layer and type that supplied the value.
pub fn lookup_entry<'a>(view: &'a ResolvedView, field: &str) -> Option<Entry<'a>> {
    view.entry(field)
}
