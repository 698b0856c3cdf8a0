//! Cross-reference resolution
//!
//! An entry with a `crossref` field inherits every field of the referenced
//! entry that it does not define itself. Only one level is allowed: a target
//! that carries its own `crossref` is reported, as BibTeX does.

use std::collections::HashMap;

use crate::entry::{BibTeXEntry, BibTeXField};
use crate::parser::BibTeXParseError;

/// Resolve `crossref` fields within one file's entries.
///
/// Entry order is preserved and the `crossref` field is removed from every
/// resolved entry. All problems are collected before returning.
pub fn resolve_crossrefs(
    mut entries: Vec<BibTeXEntry>,
) -> Result<Vec<BibTeXEntry>, Vec<BibTeXParseError>> {
    let index: HashMap<String, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.cite_key.to_lowercase(), i))
        .collect();

    let mut errors = Vec::new();
    let mut inherited: Vec<(usize, Vec<BibTeXField>)> = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let Some(target_key) = entry.get_field("crossref") else {
            continue;
        };
        let Some(&target_index) = index.get(&target_key.trim().to_lowercase()) else {
            errors.push(BibTeXParseError::new(
                entry.line,
                1,
                format!(
                    "entry `{}` crossrefs unknown entry `{}`",
                    entry.cite_key, target_key
                ),
            ));
            continue;
        };

        let target = &entries[target_index];
        if target.has_field("crossref") {
            errors.push(BibTeXParseError::new(
                entry.line,
                1,
                format!(
                    "entry `{}` crossrefs `{}`, which has its own crossref",
                    entry.cite_key, target.cite_key
                ),
            ));
            continue;
        }

        let fields = target
            .fields
            .iter()
            .filter(|f| !entry.has_field(&f.key))
            .cloned()
            .collect();
        inherited.push((i, fields));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    for (i, fields) in inherited {
        let entry = &mut entries[i];
        entry.remove_field("crossref");
        tracing::trace!(key = %entry.cite_key, count = fields.len(), "inherited crossref fields");
        entry.fields.extend(fields);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::BibTeXEntryType;

    fn proceedings() -> BibTeXEntry {
        BibTeXEntry::new("Conf2020", BibTeXEntryType::Proceedings)
            .with_field("booktitle", "Proc. of the Test Conference")
            .with_field("year", "2020")
            .with_field("title", "Proceedings Title")
    }

    #[test]
    fn test_inherits_missing_fields() {
        let paper = BibTeXEntry::new("Doe2020", BibTeXEntryType::InProceedings)
            .with_field("title", "My Paper")
            .with_field("crossref", "conf2020");

        let resolved = resolve_crossrefs(vec![paper, proceedings()]).unwrap();

        let paper = &resolved[0];
        assert_eq!(paper.cite_key, "Doe2020");
        assert_eq!(paper.get_field("title"), Some("My Paper"));
        assert_eq!(
            paper.get_field("booktitle"),
            Some("Proc. of the Test Conference")
        );
        assert_eq!(paper.get_field("year"), Some("2020"));
        assert!(!paper.has_field("crossref"));
        assert_eq!(resolved[1].cite_key, "Conf2020");
    }

    #[test]
    fn test_own_fields_win() {
        let paper = BibTeXEntry::new("Doe2020", BibTeXEntryType::InProceedings)
            .with_field("year", "2021")
            .with_field("crossref", "Conf2020");

        let resolved = resolve_crossrefs(vec![proceedings(), paper]).unwrap();
        assert_eq!(resolved[1].get_field("year"), Some("2021"));
    }

    #[test]
    fn test_unknown_target_is_reported() {
        let mut paper = BibTeXEntry::new("Doe2020", BibTeXEntryType::InProceedings)
            .with_field("crossref", "Missing");
        paper.line = 7;

        let errors = resolve_crossrefs(vec![paper]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 7);
        assert!(errors[0].message.contains("unknown entry `Missing`"));
    }

    #[test]
    fn test_nested_crossref_is_reported() {
        let middle = proceedings().with_field("crossref", "Series");
        let series = BibTeXEntry::new("Series", BibTeXEntryType::Misc);
        let paper = BibTeXEntry::new("Doe2020", BibTeXEntryType::InProceedings)
            .with_field("crossref", "Conf2020");

        let errors = resolve_crossrefs(vec![paper, middle, series]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("has its own crossref"));
    }
}
