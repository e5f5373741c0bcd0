//! Registry of resolved types
//!
//! Holds one immutable view per type name. Types are declared
//! parents-first; a parent must already be registered when a child names it.

use classopts_core::{resolve, InconsistentHierarchyError, ResolvedView, TypeDecl, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Resolved views indexed by type name
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    views: HashMap<String, Arc<ResolvedView>>,
    /// Type names in declaration order
    order: Vec<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `decl` against already-declared `parents` and store the view.
    pub fn declare(
        &mut self,
        decl: TypeDecl,
        parents: &[&str],
    ) -> Result<Arc<ResolvedView>, RegistryError> {
        if self.views.contains_key(&decl.name) {
            return Err(RegistryError::DuplicateType(decl.name));
        }

        let parent_views = parents
            .iter()
            .map(|parent| {
                self.views
                    .get(*parent)
                    .map(Arc::as_ref)
                    .ok_or_else(|| RegistryError::UnknownParent {
                        type_name: decl.name.clone(),
                        parent: parent.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let view = Arc::new(resolve(&decl, &parent_views)?);
        debug!(type_name = %decl.name, mro = ?view.mro(), "declared type");

        self.views.insert(decl.name.clone(), Arc::clone(&view));
        self.order.push(decl.name);
        Ok(view)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ResolvedView>> {
        self.views.get(name)
    }

    /// Look up `field` on type `name`.
    ///
    /// `Ok(None)` means the type exists but no layer declares the field.
    pub fn lookup(&self, name: &str, field: &str) -> Result<Option<&Value>, RegistryError> {
        self.views
            .get(name)
            .map(|view| view.get(field))
            .ok_or_else(|| RegistryError::UnknownType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Type names in the order they were declared
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Registry errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("Type already declared: {0}")]
    DuplicateType(String),

    #[error("Type '{type_name}' names undeclared parent '{parent}'")]
    UnknownParent { type_name: String, parent: String },

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error(transparent)]
    Inconsistent(#[from] InconsistentHierarchyError),
}
