//! Declaration keys
//!
//! Names of the per-type tables that hold override and default options.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default name of the per-type override table
pub const DEFAULT_OVERRIDES_KEY: &str = "Options";

/// Default name of the inherited defaults table
pub const DEFAULT_DEFAULTS_KEY: &str = "DefaultOptions";

/// Keys naming the override and default tables in a type entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeclarationKeys {
    /// Table visible on the declaring type only (default: "Options")
    pub overrides: String,

    /// Table inherited by descendants (default: "DefaultOptions")
    pub defaults: String,
}

impl Default for DeclarationKeys {
    fn default() -> Self {
        Self {
            overrides: DEFAULT_OVERRIDES_KEY.to_string(),
            defaults: DEFAULT_DEFAULTS_KEY.to_string(),
        }
    }
}

impl DeclarationKeys {
    pub fn new(overrides: impl Into<String>, defaults: impl Into<String>) -> Self {
        Self {
            overrides: overrides.into(),
            defaults: defaults.into(),
        }
    }

    /// Keys must be non-empty, distinct, and not shadow the reserved entry keys.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for key in [&self.overrides, &self.defaults] {
            if key.is_empty() {
                return Err(ConfigError::ValidationError(
                    "declaration keys must not be empty".to_string(),
                ));
            }
            if RESERVED_KEYS.contains(&key.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "declaration key '{}' is reserved",
                    key
                )));
            }
        }

        if self.overrides == self.defaults {
            return Err(ConfigError::ValidationError(format!(
                "override and default keys must differ (both '{}')",
                self.overrides
            )));
        }

        Ok(())
    }
}

/// Keys a type entry uses for its own identity
pub(crate) const RESERVED_KEYS: &[&str] = &["name", "parents"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let keys = DeclarationKeys::default();
        assert_eq!(keys.overrides, "Options");
        assert_eq!(keys.defaults, "DefaultOptions");
        assert!(keys.validate().is_ok());
    }

    #[test]
    fn test_same_keys_rejected() {
        let keys = DeclarationKeys::new("Meta", "Meta");
        let err = keys.validate().unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(DeclarationKeys::new("", "DefaultMeta").validate().is_err());
    }

    #[test]
    fn test_reserved_key_rejected() {
        let err = DeclarationKeys::new("parents", "DefaultMeta")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }
}
