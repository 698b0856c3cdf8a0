//! Test fixture loading utilities

use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Path of a BibTeX fixture
pub fn bibtex_fixture_path(name: &str) -> PathBuf {
    fixture_path(&format!("bibtex/{}", name))
}

/// Load a BibTeX fixture
#[allow(dead_code)]
pub fn load_bibtex_fixture(name: &str) -> String {
    let path = bibtex_fixture_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", path.display()))
}
