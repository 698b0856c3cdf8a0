//! Test fixture loading utilities

use std::path::PathBuf;

use bib2cv_bibtex::BibTeXEntry;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load and resolve the entries of a BibTeX fixture
pub fn load_bibtex_fixture(name: &str) -> Vec<BibTeXEntry> {
    let path = fixture_path(&format!("bibtex/{}", name));
    bib2cv_bibtex::load_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {e}", path.display()))
}
