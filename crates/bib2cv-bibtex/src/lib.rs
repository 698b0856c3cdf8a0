//! BibTeX loading for bib2cv
//!
//! This crate turns `.bib` files into ordered, cross-reference-resolved
//! entries and provides the text helpers the citation formatter needs.
//!
//! Features:
//! - Nom-based parser with `@string` macros and error recovery
//! - Cross-reference resolution
//! - BibTeX author-list and name splitting (First von Last, Jr)
//! - LaTeX markup to plain text conversion and title casing
//! - Month field interpretation

mod crossref;
mod entry;
mod error;
mod latex_decoder;
mod loader;
mod month;
mod names;
pub mod parser;
mod title_case;

pub use crossref::resolve_crossrefs;
pub use entry::{BibTeXEntry, BibTeXEntryType, BibTeXField};
pub use error::{Diagnostic, LoadError};
pub use loader::{load_file, load_files, load_str};
pub use month::parse_month;
pub use names::{parse_names, split_authors, try_parse_names, NameError, PersonName};
pub use parser::{parse, BibTeXParseError, BibTeXParseResult};
pub use title_case::title_case;

pub use latex_decoder::tex_to_plain;
