//! Tracing setup for the CLI.
//!
//! Output format is controlled by `CLASSOPTS_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` lines
//! - `json`: one JSON object per event
//!
//! ```bash
//! CLASSOPTS_LOG=debug classopts show Pencil
//! CLASSOPTS_LOG="classopts_core=trace" CLASSOPTS_LOG_FORMAT=json classopts mro Pencil
//! ```
//!
//! Nothing is installed unless `CLASSOPTS_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("CLASSOPTS_LOG_FORMAT").unwrap_or_default())
    }
}

/// `CLASSOPTS_LOG` takes precedence over `RUST_LOG`.
fn build_filter() -> Option<EnvFilter> {
    if let Ok(val) = std::env::var("CLASSOPTS_LOG") {
        Some(EnvFilter::builder().parse_lossy(val))
    } else if std::env::var("RUST_LOG").is_ok() {
        Some(EnvFilter::from_default_env())
    } else {
        None
    }
}

/// Install the global subscriber. All output goes to stderr.
pub fn init_tracing() {
    let Some(filter) = build_filter() else {
        return;
    };

    match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
    }
}
