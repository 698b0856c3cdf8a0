//! IEEE citation style
//!
//! Each entry type cites a fixed list of fields (see
//! [`citation_fields`](crate::citation_fields)). Every field name maps to a
//! rule that renders its value; missing or empty fields are left out. The
//! author and title pieces come first and carry their own separators, the
//! remaining pieces are joined with `", "`:
//!
//! ```text
//! J. Smith, "Great Results," \textit{Journal of Tests}, vol. 3, pp. 1-10, 2020
//! ```

use bib2cv_bibtex::{parse_month, parse_names, tex_to_plain, title_case, BibTeXEntry, PersonName};
use tracing::{debug, warn};

use crate::highlight::HighlightTarget;
use crate::latex::{escape_ampersands, escape_specials};
use crate::taxonomy::citation_fields;

/// Prefix of DOI links
pub const DOI_RESOLVER: &str = "http://dx.doi.org/";

/// State shared by the field rules while formatting one entry
struct FormatContext<'a> {
    highlight: Option<&'a HighlightTarget>,
}

/// Renders a field's non-empty value; `None` leaves the field out
type FieldRule = fn(&FormatContext<'_>, &str, &BibTeXEntry) -> Option<String>;

/// Where a rendered field goes in the citation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Written as is, in field order, before the joined fields
    Lead,
    /// Joined with `", "`
    Joined,
}

const FIELD_RULES: &[(&str, Placement, FieldRule)] = &[
    ("author", Placement::Lead, format_author),
    ("title", Placement::Lead, format_title),
    ("journal", Placement::Joined, format_journal),
    ("booktitle", Placement::Joined, format_booktitle),
    ("volume", Placement::Joined, format_volume),
    ("number", Placement::Joined, format_number),
    ("pages", Placement::Joined, format_pages),
    ("year", Placement::Joined, format_year),
    ("doi", Placement::Joined, format_doi),
    ("school", Placement::Joined, format_plain),
    ("address", Placement::Joined, format_plain),
];

fn field_rule(field: &str) -> Option<(Placement, FieldRule)> {
    FIELD_RULES
        .iter()
        .find(|(name, _, _)| *name == field)
        .map(|(_, placement, rule)| (*placement, *rule))
}

/// Formats entries as IEEE citations
#[derive(Debug, Clone, Default)]
pub struct CitationFormatter {
    highlight: Option<HighlightTarget>,
}

impl CitationFormatter {
    /// A formatter that sets `highlight` in bold wherever it is an author
    pub fn new(highlight: Option<HighlightTarget>) -> Self {
        Self { highlight }
    }

    /// The citation text of one entry, without the `\item`
    pub fn format(&self, entry: &BibTeXEntry) -> String {
        let Some(fields) = citation_fields(entry.entry_type) else {
            debug!(key = %entry.cite_key, entry_type = %entry.entry_type, "no citation fields for entry type");
            return String::new();
        };

        let ctx = FormatContext {
            highlight: self.highlight.as_ref(),
        };
        let mut citation = String::new();
        let mut joined = Vec::new();

        for field in fields {
            let Some(value) = entry.get_field(field).map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            let Some((placement, rule)) = field_rule(field) else {
                continue;
            };
            let Some(piece) = rule(&ctx, value, entry) else {
                continue;
            };
            match placement {
                Placement::Lead => citation.push_str(&piece),
                Placement::Joined => joined.push(piece),
            }
        }

        citation.push_str(&joined.join(", "));
        citation
    }
}

// ===== Names =====

/// IEEE form of a name: initials for the first and von parts, then the
/// last name and any suffix, e.g. `J. v. Smith, Jr`
pub fn ieee_name(name: &PersonName) -> String {
    let mut result = String::new();
    result.push_str(&initial(&name.first));
    result.push_str(&initial(&name.von));
    result.push_str(&name.last);
    if !name.jr.is_empty() {
        result.push_str(", ");
        result.push_str(&name.jr);
    }
    result
}

fn initial(part: &str) -> String {
    match tex_to_plain(part).trim_start().chars().next() {
        Some(c) => format!("{c}. "),
        None => String::new(),
    }
}

/// Join rendered author names.
///
/// One name stands alone, two are joined with "and", longer lists use a
/// serial comma before the final "and". A `truncated` list ends in
/// "et al." instead.
pub fn join_authors(names: &[String], truncated: bool) -> String {
    if truncated {
        return format!("{} et al.", names.join(", "));
    }
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

// ===== Field rules =====

fn format_author(ctx: &FormatContext<'_>, value: &str, _entry: &BibTeXEntry) -> Option<String> {
    let mut names = parse_names(value);
    let truncated = names.last().is_some_and(PersonName::is_others);
    if truncated {
        names.pop();
    }
    if names.is_empty() {
        return None;
    }

    let rendered: Vec<String> = names
        .iter()
        .map(|name| {
            let text = escape_specials(&tex_to_plain(&ieee_name(name)));
            match ctx.highlight {
                Some(target) if target.matches(name) => format!("\\textbf{{{text}}}"),
                _ => text,
            }
        })
        .collect();

    Some(format!("{}, ", join_authors(&rendered, truncated)))
}

fn format_title(_ctx: &FormatContext<'_>, value: &str, _entry: &BibTeXEntry) -> Option<String> {
    let mut title = escape_specials(&tex_to_plain(&title_case(value)));
    if !ends_sentence(value) {
        title.push(',');
    }
    Some(format!("\"{title}\" "))
}

/// Whether a raw title already ends in `?`, `.` or `!`, ignoring closing braces
fn ends_sentence(raw: &str) -> bool {
    raw.trim_end_matches(|c: char| c.is_whitespace() || c == '}')
        .ends_with(|c: char| matches!(c, '?' | '.' | '!'))
}

fn format_journal(_ctx: &FormatContext<'_>, value: &str, _entry: &BibTeXEntry) -> Option<String> {
    Some(format!("\\textit{{{}}}", escape_ampersands(value)))
}

fn format_booktitle(_ctx: &FormatContext<'_>, value: &str, _entry: &BibTeXEntry) -> Option<String> {
    Some(format!("in \\textit{{{}}}", escape_ampersands(value)))
}

fn format_volume(_ctx: &FormatContext<'_>, value: &str, _entry: &BibTeXEntry) -> Option<String> {
    Some(format!("vol. {value}"))
}

fn format_number(_ctx: &FormatContext<'_>, value: &str, _entry: &BibTeXEntry) -> Option<String> {
    Some(format!("no. {value}"))
}

fn format_pages(_ctx: &FormatContext<'_>, value: &str, _entry: &BibTeXEntry) -> Option<String> {
    Some(format!("pp. {value}"))
}

fn format_year(_ctx: &FormatContext<'_>, value: &str, entry: &BibTeXEntry) -> Option<String> {
    let Some(month) = entry.get_field("month").map(str::trim).filter(|m| !m.is_empty()) else {
        return Some(value.to_string());
    };
    match parse_month(month) {
        Some(month) => Some(format!("{}. {}", &month.name()[..3], value)),
        None => {
            warn!(key = %entry.cite_key, month, "unrecognized month, citing the year only");
            Some(value.to_string())
        }
    }
}

fn format_doi(_ctx: &FormatContext<'_>, value: &str, _entry: &BibTeXEntry) -> Option<String> {
    Some(format!("doi: \\href{{{DOI_RESOLVER}{value}}}{{{value}}}"))
}

fn format_plain(_ctx: &FormatContext<'_>, value: &str, _entry: &BibTeXEntry) -> Option<String> {
    Some(escape_ampersands(value))
}
