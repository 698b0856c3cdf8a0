//! LaTeX output for the citation list

use std::io::{self, Write};

use crate::bucket::Buckets;
use crate::ieee::CitationFormatter;

/// Write every bucket as a `\subsubsection` heading and an `enumerate` list.
///
/// Empty buckets still get their heading and an empty list.
pub fn write_citation_list<W: Write>(
    out: &mut W,
    buckets: &Buckets<'_>,
    formatter: &CitationFormatter,
) -> io::Result<()> {
    for bucket in buckets {
        let publication_type = bucket.publication_type;
        writeln!(
            out,
            "\\subsubsection{{{}}}\\label{{{}}}",
            publication_type.display_name, publication_type.name
        )?;
        writeln!(out, "\\begin{{enumerate}}")?;
        for entry in &bucket.entries {
            writeln!(out, "\\item {}", formatter.format(entry))?;
        }
        writeln!(out, "\\end{{enumerate}}")?;
    }
    Ok(())
}

/// Escape bare `&` in a raw field value; `\&` is left as is
pub fn escape_ampersands(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if c == '&' && previous != Some('\\') {
            result.push('\\');
        }
        result.push(c);
        previous = Some(c);
    }
    result
}

/// Escape every character LaTeX treats specially in running text.
///
/// For plain text out of `tex_to_plain`: every character is literal, so a
/// backslash is a real backslash and not the start of an escape.
pub fn escape_specials(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                result.push('\\');
                result.push(c);
            }
            '~' => result.push_str("\\textasciitilde{}"),
            '^' => result.push_str("\\textasciicircum{}"),
            '\\' => result.push_str("\\textbackslash{}"),
            c => result.push(c),
        }
    }
    result
}
