//! Hierarchy file fixtures

use std::path::{Path, PathBuf};

/// Path to the diamond hierarchy fixture
pub fn diamond_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/diamond.toml")
}

/// Path to the contradictory hierarchy fixture
pub fn inconsistent_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/inconsistent.toml")
}
