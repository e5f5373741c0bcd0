//! Resolution report with full provenance
//!
//! Captures a type's materialized options plus the layer and type each
//! value came from.

use chrono::{DateTime, Utc};
use classopts_core::{Layer, ResolvedView};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use super::hierarchy::SourceInfo;

/// Schema version for resolution reports
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "classopts/resolved@1";

/// Where one resolved field was declared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOrigin {
    pub layer: Layer,
    pub owner: String,
}

/// Resolved options for one type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedReport {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this report was computed
    pub created_at: DateTime<Utc>,

    /// Type the report describes
    pub type_name: String,

    /// Linearized default chain, most specific first
    pub mro: Vec<String>,

    /// The materialized options object
    pub options: Value,

    /// Origin of every field in `options`
    pub origins: BTreeMap<String, FieldOrigin>,

    /// Hierarchy file the type came from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
}

impl ResolvedReport {
    /// Build a report from a resolved view
    pub fn build(view: &ResolvedView, source: Option<&SourceInfo>) -> Self {
        let origins = view
            .fields()
            .into_iter()
            .filter_map(|field| {
                view.entry(field).map(|entry| {
                    (
                        field.to_string(),
                        FieldOrigin {
                            layer: entry.layer,
                            owner: entry.owner.to_string(),
                        },
                    )
                })
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            type_name: view.name().to_string(),
            mro: view.mro().into_iter().map(String::from).collect(),
            options: view.materialize().to_json(),
            origins,
            source: source.cloned(),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary
    pub fn to_human(&self) -> String {
        let mut out = format!("Type: {}\n", self.type_name);
        out.push_str(&format!("  MRO: {}\n", self.mro.join(" -> ")));
        if let Some(ref source) = self.source {
            let short = &source.digest[..12.min(source.digest.len())];
            out.push_str(&format!("  Source: {} ({})\n", source.path, short));
        }
        out.push_str("  Options:\n");
        for (field, origin) in &self.origins {
            let value = self.options.get(field).unwrap_or(&Value::Null);
            let layer = match origin.layer {
                Layer::Override => "override",
                Layer::Default => "default",
            };
            out.push_str(&format!(
                "    {} = {} [{} from {}]\n",
                field, value, layer, origin.owner
            ));
        }
        out
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Get an option value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.options;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classopts_core::{resolve, TypeDecl};
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn pencil() -> ResolvedView {
        let a = resolve(
            &TypeDecl::new("A").with_defaults(
                classopts_core::FieldMap::new()
                    .with("color", "red")
                    .with("size", 2)
                    .with("tip", json!({"kind": "graphite"})),
            ),
            &[],
        )
        .unwrap();
        resolve(&TypeDecl::new("B").with_overrides([("color", "blue")]), &[&a]).unwrap()
    }

    #[test]
    fn test_build_report() {
        let report = ResolvedReport::build(&pencil(), None);

        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert_eq!(report.schema_id, SCHEMA_ID);
        assert_eq!(report.type_name, "B");
        assert_eq!(report.mro, vec!["B", "A"]);
        assert_eq!(report.get("color"), Some(&json!("blue")));
        assert_eq!(report.get("size"), Some(&json!(2)));
        assert_eq!(report.get("tip.kind"), Some(&json!("graphite")));
        assert_eq!(report.get("missing"), None);
    }

    #[test]
    fn test_origins() {
        let report = ResolvedReport::build(&pencil(), None);

        assert_eq!(
            report.origins["color"],
            FieldOrigin {
                layer: Layer::Override,
                owner: "B".to_string()
            }
        );
        assert_eq!(report.origins["size"].layer, Layer::Default);
        assert_eq!(report.origins["size"].owner, "A");
    }

    #[test]
    fn test_json_shape() {
        let source = SourceInfo {
            path: "classopts.toml".to_string(),
            digest: "ab".repeat(32),
        };
        let report = ResolvedReport::build(&pencil(), Some(&source));
        let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["schema_id"], "classopts/resolved@1");
        assert_eq!(value["origins"]["color"], json!({"layer": "override", "owner": "B"}));
        assert_eq!(value["source"]["path"], "classopts.toml");
    }

    #[test]
    fn test_source_omitted_when_absent() {
        let report = ResolvedReport::build(&pencil(), None);
        let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert!(value.get("source").is_none());
    }

    #[test]
    fn test_human_summary() {
        let human = ResolvedReport::build(&pencil(), None).to_human();
        assert!(human.contains("MRO: B -> A"));
        assert!(human.contains("color = \"blue\" [override from B]"));
        assert!(human.contains("size = 2 [default from A]"));
    }

    #[test]
    fn test_write_to_file() {
        let temp = NamedTempFile::new().unwrap();
        ResolvedReport::build(&pencil(), None)
            .write_to_file(temp.path())
            .unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(temp.path()).unwrap()).unwrap();
        assert_eq!(written["type_name"], "B");
    }
}
