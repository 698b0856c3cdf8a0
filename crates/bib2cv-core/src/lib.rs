//! Citation list generation for bib2cv
//!
//! Takes the entries loaded by `bib2cv-bibtex`, groups them by publication
//! type and renders each group as a LaTeX `enumerate` block of IEEE-style
//! citations.
//!
//! ```ignore
//! use bib2cv_core::{convert, HighlightTarget};
//!
//! let entries = bib2cv_bibtex::load_files(["cv.bib"])?;
//! let me: HighlightTarget = "Smith,John".parse()?;
//! convert(&entries, Some(me), &mut std::io::stdout().lock())?;
//! ```

mod bucket;
mod highlight;
pub mod ieee;
mod latex;
mod taxonomy;

use std::io::{self, Write};

use bib2cv_bibtex::BibTeXEntry;

pub use bucket::{bucketize, Bucket, Buckets};
pub use highlight::{HighlightTarget, ParseHighlightError};
pub use ieee::{ieee_name, join_authors, CitationFormatter};
pub use latex::{escape_ampersands, escape_specials, write_citation_list};
pub use taxonomy::{citation_fields, PublicationType, PUBLICATION_TYPES};

/// Bucket `entries` with the standard taxonomy and write the citation list
pub fn convert<W: Write>(
    entries: &[BibTeXEntry],
    highlight: Option<HighlightTarget>,
    out: &mut W,
) -> io::Result<()> {
    let buckets = bucketize(entries, PUBLICATION_TYPES);
    let formatter = CitationFormatter::new(highlight);
    write_citation_list(out, &buckets, &formatter)
}
