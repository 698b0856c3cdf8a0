//! Publication categories and the citation fields of each entry type

use bib2cv_bibtex::BibTeXEntryType;

/// A category of the citation list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationType {
    /// Used as the LaTeX `\label`
    pub name: &'static str,
    /// Used as the `\subsubsection` heading
    pub display_name: &'static str,
    /// Entry types that belong to this category
    pub entry_types: &'static [BibTeXEntryType],
}

impl PublicationType {
    pub fn accepts(&self, entry_type: BibTeXEntryType) -> bool {
        self.entry_types.contains(&entry_type)
    }
}

/// Categories in the order they are printed.
///
/// `@conference` entries parse as [`BibTeXEntryType::InProceedings`] and so
/// land in `conferences` too.
pub const PUBLICATION_TYPES: &[PublicationType] = &[
    PublicationType {
        name: "journals",
        display_name: "Journals",
        entry_types: &[BibTeXEntryType::Article],
    },
    PublicationType {
        name: "conferences",
        display_name: "Conferences",
        entry_types: &[BibTeXEntryType::InProceedings],
    },
    PublicationType {
        name: "thesis",
        display_name: "Theses and dissertations",
        entry_types: &[BibTeXEntryType::PhdThesis, BibTeXEntryType::MastersThesis],
    },
];

const ARTICLE_FIELDS: &[&str] = &[
    "author", "title", "journal", "volume", "number", "pages", "year", "doi",
];
const INPROCEEDINGS_FIELDS: &[&str] = &["author", "title", "booktitle", "year", "pages", "doi"];
const THESIS_FIELDS: &[&str] = &["author", "title", "school", "address", "year"];

/// Fields cited for an entry type, in output order
pub fn citation_fields(entry_type: BibTeXEntryType) -> Option<&'static [&'static str]> {
    match entry_type {
        BibTeXEntryType::Article => Some(ARTICLE_FIELDS),
        BibTeXEntryType::InProceedings => Some(INPROCEEDINGS_FIELDS),
        BibTeXEntryType::PhdThesis | BibTeXEntryType::MastersThesis => Some(THESIS_FIELDS),
        _ => None,
    }
}
