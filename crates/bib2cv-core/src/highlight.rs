//! The author emphasized in every citation

use std::fmt;
use std::str::FromStr;

use bib2cv_bibtex::{tex_to_plain, PersonName};

/// Error parsing a `Last,First` highlight name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseHighlightError {
    #[error("missing last name in '{0}', expected \"Last,First\"")]
    MissingLastName(String),
}

/// An author to set in bold, matched on last and first name.
///
/// Both sides are compared as decoded, lowercased text, so `M{\"u}ller`
/// in a bibliography matches `Müller` on the command line. The von part
/// does not take part in the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightTarget {
    last: String,
    first: String,
}

impl HighlightTarget {
    pub fn new(last: &str, first: &str) -> Self {
        Self {
            last: normalize(last),
            first: normalize(first),
        }
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn matches(&self, name: &PersonName) -> bool {
        !name.is_others() && normalize(&name.last) == self.last && normalize(&name.first) == self.first
    }
}

impl FromStr for HighlightTarget {
    type Err = ParseHighlightError;

    /// Parses `Last,First`; a bare `Last` matches authors without a first name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let last = parts.next().unwrap_or_default();
        let first = parts.next().unwrap_or_default();

        if last.trim().is_empty() {
            return Err(ParseHighlightError::MissingLastName(s.to_string()));
        }
        Ok(Self::new(last, first))
    }
}

impl fmt::Display for HighlightTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.last, self.first)
    }
}

fn normalize(part: &str) -> String {
    tex_to_plain(part)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
