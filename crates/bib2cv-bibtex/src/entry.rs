//! BibTeX entry data structures

use crate::month::parse_month;
use crate::names::{parse_names, PersonName};

/// BibTeX entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BibTeXEntryType {
    Article,
    Book,
    Booklet,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    Misc,
    PhdThesis,
    Proceedings,
    TechReport,
    Unpublished,
    Unknown,
}

impl BibTeXEntryType {
    /// Parse an entry type from a string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "booklet" => Self::Booklet,
            "inbook" => Self::InBook,
            "incollection" => Self::InCollection,
            "inproceedings" | "conference" => Self::InProceedings,
            "manual" => Self::Manual,
            "mastersthesis" => Self::MastersThesis,
            "misc" => Self::Misc,
            "phdthesis" => Self::PhdThesis,
            "proceedings" => Self::Proceedings,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            _ => Self::Unknown,
        }
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Booklet => "booklet",
            Self::InBook => "inbook",
            Self::InCollection => "incollection",
            Self::InProceedings => "inproceedings",
            Self::Manual => "manual",
            Self::MastersThesis => "mastersthesis",
            Self::Misc => "misc",
            Self::PhdThesis => "phdthesis",
            Self::Proceedings => "proceedings",
            Self::TechReport => "techreport",
            Self::Unpublished => "unpublished",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BibTeXEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single BibTeX field (key-value pair)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXField {
    pub key: String,
    pub value: String,
}

/// A parsed BibTeX entry
///
/// Field values are kept exactly as written between the delimiters, with
/// `@string` macros and `#` concatenation already expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXEntry {
    pub cite_key: String,
    pub entry_type: BibTeXEntryType,
    pub fields: Vec<BibTeXField>,
    /// 1-based line of the `@` that opens the entry (0 when built by hand)
    pub line: u32,
}

impl BibTeXEntry {
    /// Create a new BibTeX entry
    pub fn new(cite_key: impl Into<String>, entry_type: BibTeXEntryType) -> Self {
        Self {
            cite_key: cite_key.into(),
            entry_type,
            fields: Vec::new(),
            line: 0,
        }
    }

    /// Add a field to the entry
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(BibTeXField {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Builder-style variant of [`add_field`](Self::add_field)
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_field(key, value);
        self
    }

    /// Get a field value by key (case-insensitive)
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key.eq_ignore_ascii_case(key))
            .map(|f| f.value.as_str())
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.get_field(key).is_some()
    }

    /// Remove a field, returning its value if it was present
    pub fn remove_field(&mut self, key: &str) -> Option<String> {
        let pos = self
            .fields
            .iter()
            .position(|f| f.key.eq_ignore_ascii_case(key))?;
        Some(self.fields.remove(pos).value)
    }

    /// Parsed author list, empty when the entry has no author field
    pub fn authors(&self) -> Vec<PersonName> {
        self.get_field("author").map(parse_names).unwrap_or_default()
    }

    /// Month as a calendar month, if the field is present and recognisable
    pub fn month(&self) -> Option<chrono::Month> {
        self.get_field("month").and_then(parse_month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_parsing() {
        assert_eq!(
            BibTeXEntryType::from_str("article"),
            BibTeXEntryType::Article
        );
        assert_eq!(
            BibTeXEntryType::from_str("ARTICLE"),
            BibTeXEntryType::Article
        );
        assert_eq!(
            BibTeXEntryType::from_str("conference"),
            BibTeXEntryType::InProceedings
        );
        assert_eq!(
            BibTeXEntryType::from_str("PhDThesis"),
            BibTeXEntryType::PhdThesis
        );
        assert_eq!(
            BibTeXEntryType::from_str("online"),
            BibTeXEntryType::Unknown
        );
    }

    #[test]
    fn test_entry_field_access() {
        let mut entry = BibTeXEntry::new("Smith2024", BibTeXEntryType::Article);
        entry.add_field("title", "A Great Paper");
        entry.add_field("Author", "John Smith");
        entry.add_field("YEAR", "2024");

        assert_eq!(entry.get_field("title"), Some("A Great Paper"));
        assert_eq!(entry.get_field("author"), Some("John Smith"));
        assert_eq!(entry.get_field("YEAR"), Some("2024"));
        assert_eq!(entry.get_field("doi"), None);
        assert!(entry.has_field("Title"));
    }

    #[test]
    fn test_remove_field() {
        let mut entry = BibTeXEntry::new("Doe2020", BibTeXEntryType::InProceedings)
            .with_field("crossref", "Conf2020")
            .with_field("title", "Paper");

        assert_eq!(entry.remove_field("CROSSREF"), Some("Conf2020".to_string()));
        assert_eq!(entry.remove_field("crossref"), None);
        assert_eq!(entry.fields.len(), 1);
    }

    #[test]
    fn test_authors_and_month() {
        let entry = BibTeXEntry::new("Doe2020", BibTeXEntryType::Article)
            .with_field("author", "Doe, Jane and Richard Roe")
            .with_field("month", "mar");

        let authors = entry.authors();
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].last, "Doe");
        assert_eq!(authors[1].first, "Richard");
        assert_eq!(entry.month(), Some(chrono::Month::March));
    }
}
