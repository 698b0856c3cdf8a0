//! Loading bibliography files
//!
//! Each file is read to completion, parsed and cross-reference resolved on
//! its own, then its entries are appended to the result in file order.
//! Problems are gathered across all files and reported in one
//! [`LoadError::Input`].

use std::path::Path;

use tracing::debug;

use crate::crossref::resolve_crossrefs;
use crate::entry::BibTeXEntry;
use crate::error::{Diagnostic, LoadError};
use crate::names::try_parse_names;
use crate::parser::parse;

/// Parse and resolve one file's contents. `path` only labels diagnostics.
pub fn load_str(path: &Path, text: &str) -> (Vec<BibTeXEntry>, Vec<Diagnostic>) {
    let parsed = parse(text);
    let mut diagnostics: Vec<Diagnostic> = parsed
        .errors
        .into_iter()
        .map(|e| Diagnostic::from_parse_error(path, e))
        .collect();

    for entry in &parsed.entries {
        if let Some(Err(e)) = entry.get_field("author").map(try_parse_names) {
            diagnostics.push(Diagnostic {
                path: path.to_path_buf(),
                line: entry.line,
                column: 1,
                message: format!("{} in entry `{}`", e, entry.cite_key),
            });
        }
    }

    let entries = match resolve_crossrefs(parsed.entries) {
        Ok(entries) => entries,
        Err(errors) => {
            diagnostics.extend(errors.into_iter().map(|e| Diagnostic::from_parse_error(path, e)));
            Vec::new()
        }
    };

    (entries, diagnostics)
}

/// Load a single bibliography file
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<BibTeXEntry>, LoadError> {
    load_files([path])
}

/// Load bibliography files in order, concatenating their entries
pub fn load_files<I, P>(paths: I) -> Result<Vec<BibTeXEntry>, LoadError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut entries = Vec::new();
    let mut diagnostics = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let (file_entries, file_diagnostics) = load_str(path, &text);
        debug!(
            path = %path.display(),
            entries = file_entries.len(),
            problems = file_diagnostics.len(),
            "loaded bibliography"
        );
        entries.extend(file_entries);
        diagnostics.extend(file_diagnostics);
    }

    if diagnostics.is_empty() {
        Ok(entries)
    } else {
        Err(LoadError::Input { diagnostics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn bib_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_str_resolves_crossrefs() {
        let text = r#"
@inproceedings{Paper, title = {T}, crossref = {Conf}}
@proceedings{Conf, booktitle = {Proc. Conf}, year = 2019}
"#;
        let (entries, diagnostics) = load_str(Path::new("refs.bib"), text);
        assert!(diagnostics.is_empty());
        assert_eq!(entries[0].get_field("booktitle"), Some("Proc. Conf"));
    }

    #[test]
    fn test_malformed_author_is_reported() {
        let text = "@article{Good, author = {Doe, J.}}\n@article{Bad, author = {, John and Doe, J.}}\n";
        let (_, diagnostics) = load_str(Path::new("refs.bib"), text);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(
            diagnostics[0].message,
            "name `, John` has no last name in entry `Bad`"
        );
    }

    #[test]
    fn test_load_files_concatenates_in_order() {
        let first = bib_file("@article{B, title = {Second key, first file}}");
        let second = bib_file("@article{A, title = {First key, second file}}");

        let entries = load_files([first.path(), second.path()]).unwrap();
        let keys: Vec<_> = entries.iter().map(|e| e.cite_key.as_str()).collect();
        assert_eq!(keys, vec!["B", "A"]);
    }

    #[test]
    fn test_same_key_in_two_files_is_allowed() {
        let first = bib_file("@article{Same, title = {One}}");
        let second = bib_file("@article{Same, title = {Two}}");

        let entries = load_files([first.path(), second.path()]).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_diagnostics_from_all_files_are_collected() {
        let first = bib_file("@article{Bad, title = }\n@article{Worse, = x}\n");
        let second = bib_file("@article{X, crossref = {Nowhere}}\n");

        let diagnostics = match load_files([first.path(), second.path()]) {
            Err(LoadError::Input { diagnostics }) => diagnostics,
            other => panic!("expected input error, got {other:?}"),
        };
        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics[0].path, first.path());
        assert_eq!(diagnostics[1].line, 2);
        assert_eq!(diagnostics[2].path, second.path());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_file("/definitely/not/here.bib").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.bib"));
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            path: "refs.bib".into(),
            line: 3,
            column: 1,
            message: "failed to parse entry `@article{Bad,`".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "refs.bib:3:1: failed to parse entry `@article{Bad,`"
        );
    }
}
