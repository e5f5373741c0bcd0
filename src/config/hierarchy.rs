//! Hierarchy files
//!
//! A TOML document declaring types, their parents, and their option tables:
//!
//! ```toml
//! [keys]
//! overrides = "Options"
//! defaults = "DefaultOptions"
//!
//! [[types]]
//! name = "A"
//! [types.DefaultOptions]
//! color = "red"
//!
//! [[types]]
//! name = "B"
//! parents = ["A"]
//! [types.Options]
//! color = "blue"
//! ```

use classopts_core::{FieldMap, TypeDecl};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::keys::DeclarationKeys;
use super::ConfigError;
use crate::registry::TypeRegistry;

/// Where a hierarchy was loaded from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub path: String,

    /// SHA-256 digest of raw file bytes
    pub digest: String,
}

/// One declared type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    pub decl: TypeDecl,

    /// Direct parents in declaration order
    pub parents: Vec<String>,
}

impl TypeEntry {
    pub fn name(&self) -> &str {
        &self.decl.name
    }
}

/// A parsed hierarchy file
#[derive(Debug, Clone)]
pub struct HierarchyFile {
    pub keys: DeclarationKeys,

    /// Types in file order
    pub types: Vec<TypeEntry>,

    /// None when parsed from a string
    pub source: Option<SourceInfo>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHierarchy {
    #[serde(default)]
    keys: DeclarationKeys,

    #[serde(default)]
    types: Vec<toml::Table>,
}

impl HierarchyFile {
    /// Load and parse a TOML file, recording its digest
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        let mut file = Self::parse(&contents)?;
        file.source = Some(SourceInfo {
            path: path.to_string_lossy().to_string(),
            digest,
        });
        debug!(path = %path.display(), types = file.types.len(), "loaded hierarchy");
        Ok(file)
    }

    /// Parse a hierarchy from TOML text
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawHierarchy = toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        raw.keys.validate()?;

        let types = raw
            .types
            .into_iter()
            .enumerate()
            .map(|(index, table)| Self::parse_entry(index, table, &raw.keys))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            keys: raw.keys,
            types,
            source: None,
        })
    }

    fn parse_entry(
        index: usize,
        table: toml::Table,
        keys: &DeclarationKeys,
    ) -> Result<TypeEntry, ConfigError> {
        let name = match table.get("name") {
            Some(toml::Value::String(name)) if !name.is_empty() => name.clone(),
            Some(_) => {
                return Err(ConfigError::ValidationError(format!(
                    "types[{}].name must be a non-empty string",
                    index
                )));
            }
            None => {
                return Err(ConfigError::ValidationError(format!(
                    "types[{}] is missing a name",
                    index
                )));
            }
        };

        let mut decl = TypeDecl::new(name.clone());
        let mut parents = Vec::new();

        for (key, value) in table {
            match key.as_str() {
                "name" => {}
                "parents" => parents = Self::parse_parents(&name, value)?,
                k if k == keys.overrides => {
                    decl.overrides = Some(Self::parse_field_map(&name, &key, value)?)
                }
                k if k == keys.defaults => {
                    decl.defaults = Some(Self::parse_field_map(&name, &key, value)?)
                }
                _ => {
                    return Err(ConfigError::ValidationError(format!(
                        "type '{}': unexpected key '{}' (expected name, parents, {} or {})",
                        name, key, keys.overrides, keys.defaults
                    )));
                }
            }
        }

        Ok(TypeEntry { decl, parents })
    }

    fn parse_parents(name: &str, value: toml::Value) -> Result<Vec<String>, ConfigError> {
        let invalid = || {
            ConfigError::ValidationError(format!(
                "type '{}': parents must be an array of type names",
                name
            ))
        };

        match value {
            toml::Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    toml::Value::String(parent) => Ok(parent),
                    _ => Err(invalid()),
                })
                .collect(),
            _ => Err(invalid()),
        }
    }

    fn parse_field_map(name: &str, key: &str, value: toml::Value) -> Result<FieldMap, ConfigError> {
        FieldMap::from_json(toml_to_json(value)).ok_or_else(|| {
            ConfigError::ValidationError(format!("type '{}': {} must be a table", name, key))
        })
    }

    /// Types ordered so every parent precedes its children.
    ///
    /// Stable with respect to file order.
    pub fn ordered(&self) -> Result<Vec<&TypeEntry>, ConfigError> {
        let mut declared = HashSet::new();
        for entry in &self.types {
            if !declared.insert(entry.name()) {
                return Err(ConfigError::ValidationError(format!(
                    "type '{}' is declared more than once",
                    entry.name()
                )));
            }
        }

        for entry in &self.types {
            if let Some(missing) = entry.parents.iter().find(|p| !declared.contains(p.as_str())) {
                return Err(ConfigError::ValidationError(format!(
                    "type '{}' names undeclared parent '{}'",
                    entry.name(),
                    missing
                )));
            }
        }

        let mut ordered: Vec<&TypeEntry> = Vec::with_capacity(self.types.len());
        let mut placed: HashSet<&str> = HashSet::new();
        let mut pending: Vec<&TypeEntry> = self.types.iter().collect();

        while !pending.is_empty() {
            let (ready, waiting): (Vec<&TypeEntry>, Vec<&TypeEntry>) = pending
                .into_iter()
                .partition(|entry| entry.parents.iter().all(|p| placed.contains(p.as_str())));

            if ready.is_empty() {
                let names: Vec<&str> = waiting.iter().copied().map(TypeEntry::name).collect();
                return Err(ConfigError::ValidationError(format!(
                    "inheritance cycle among: {}",
                    names.join(", ")
                )));
            }

            placed.extend(ready.iter().copied().map(TypeEntry::name));
            ordered.extend(ready);
            pending = waiting;
        }

        Ok(ordered)
    }

    /// Resolve every type into a registry
    pub fn build(&self) -> Result<TypeRegistry, ConfigError> {
        let mut registry = TypeRegistry::new();
        for entry in self.ordered()? {
            let parents: Vec<&str> = entry.parents.iter().map(String::as_str).collect();
            registry.declare(entry.decl.clone(), &parents)?;
        }
        Ok(registry)
    }
}

/// Convert TOML Value to JSON Value
pub fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PENCILS: &str = r#"
[[types]]
name = "A"
[types.DefaultOptions]
color = "red"
size = 2

[[types]]
name = "B"
parents = ["A"]
[types.Options]
color = "blue"

[[types]]
name = "C"
parents = ["B"]
[types.Options]
name = "Pencil"
"#;

    #[test]
    fn test_parse_entries() {
        let file = HierarchyFile::parse(PENCILS).unwrap();
        assert_eq!(file.keys, DeclarationKeys::default());
        assert_eq!(file.types.len(), 3);

        let b = &file.types[1];
        assert_eq!(b.name(), "B");
        assert_eq!(b.parents, vec!["A".to_string()]);
        assert_eq!(
            b.decl.overrides.as_ref().unwrap().get("color"),
            Some(&json!("blue"))
        );
        assert!(b.decl.defaults.is_none());
    }

    #[test]
    fn test_build_registry() {
        let registry = HierarchyFile::parse(PENCILS).unwrap().build().unwrap();
        assert_eq!(registry.lookup("B", "color").unwrap(), Some(&json!("blue")));
        assert_eq!(registry.lookup("C", "color").unwrap(), Some(&json!("red")));
        assert_eq!(registry.lookup("C", "size").unwrap(), Some(&json!(2)));
    }

    #[test]
    fn test_custom_keys() {
        let text = r#"
[keys]
overrides = "Meta"
defaults = "DefaultMeta"

[[types]]
name = "A"
[types.DefaultMeta]
color = "red"
[types.Meta]
size = 1
"#;
        let registry = HierarchyFile::parse(text).unwrap().build().unwrap();
        assert_eq!(registry.lookup("A", "color").unwrap(), Some(&json!("red")));
        assert_eq!(registry.lookup("A", "size").unwrap(), Some(&json!(1)));
    }

    #[test]
    fn test_unexpected_key_rejected() {
        let text = r#"
[[types]]
name = "A"
[types.Meta]
color = "red"
"#;
        let err = HierarchyFile::parse(text).unwrap_err();
        assert!(err.to_string().contains("unexpected key 'Meta'"));
    }

    #[test]
    fn test_missing_name_rejected() {
        let text = r#"
[[types]]
parents = []
"#;
        let err = HierarchyFile::parse(text).unwrap_err();
        assert!(err.to_string().contains("missing a name"));
    }

    #[test]
    fn test_options_must_be_table() {
        let text = r#"
[[types]]
name = "A"
DefaultOptions = "red"
"#;
        let err = HierarchyFile::parse(text).unwrap_err();
        assert!(err.to_string().contains("must be a table"));
    }

    #[test]
    fn test_children_may_precede_parents() {
        let text = r#"
[[types]]
name = "B"
parents = ["A"]

[[types]]
name = "A"
[types.DefaultOptions]
color = "red"
"#;
        let file = HierarchyFile::parse(text).unwrap();
        let ordered = file.ordered().unwrap();
        let order: Vec<&str> = ordered.iter().copied().map(TypeEntry::name).collect();
        assert_eq!(order, vec!["A", "B"]);
        let registry = file.build().unwrap();
        assert_eq!(registry.lookup("B", "color").unwrap(), Some(&json!("red")));
    }

    #[test]
    fn test_cycle_rejected() {
        let text = r#"
[[types]]
name = "A"
parents = ["B"]

[[types]]
name = "B"
parents = ["A"]
"#;
        let err = HierarchyFile::parse(text).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("inheritance cycle among: A, B"));
    }

    #[test]
    fn test_undeclared_parent_rejected() {
        let text = r#"
[[types]]
name = "B"
parents = ["A"]
"#;
        let err = HierarchyFile::parse(text).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("undeclared parent 'A'"));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let text = r#"
[[types]]
name = "A"

[[types]]
name = "A"
"#;
        let err = HierarchyFile::parse(text).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_load_records_digest() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "{}", PENCILS).unwrap();

        let file = HierarchyFile::load(temp.path()).unwrap();
        let source = file.source.unwrap();
        assert_eq!(source.digest.len(), 64);
        assert_eq!(source.path, temp.path().to_string_lossy());
    }

    #[test]
    fn test_load_missing_file() {
        let err = HierarchyFile::load(Path::new("/nonexistent/classopts.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_toml_to_json_nested() {
        let value: toml::Value = toml::from_str("a = { b = [1, 2.5, true] }").unwrap();
        assert_eq!(toml_to_json(value), json!({"a": {"b": [1, 2.5, true]}}));
    }
}
