//! BibTeX parser implementation using nom
//!
//! This parser handles standard BibTeX format including:
//! - @string definitions and the predefined month macros
//! - @preamble declarations
//! - @comment sections
//! - All standard entry types
//! - Braced and quoted field values
//! - String concatenation with #
//! - Nested braces in field values
//!
//! Problems are collected as [`BibTeXParseError`]s instead of aborting, so one
//! pass reports every malformed entry of a file. A reference to a macro that
//! is neither defined by `@string` nor a month name is one of them.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{map, opt},
    IResult,
};
use std::collections::{HashMap, HashSet};

use crate::entry::{BibTeXEntry, BibTeXEntryType};
use crate::month::month_macro;

/// Parse error information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXParseError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl BibTeXParseError {
    pub(crate) fn new(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Result of parsing a BibTeX file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BibTeXParseResult {
    /// Entries in the order they appear in the input
    pub entries: Vec<BibTeXEntry>,
    pub preambles: Vec<String>,
    /// `@string` macros, keyed by lowercase name
    pub strings: HashMap<String, String>,
    pub errors: Vec<BibTeXParseError>,
}

impl BibTeXParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a BibTeX string
pub fn parse(input: &str) -> BibTeXParseResult {
    let mut result = BibTeXParseResult::default();
    let mut seen_keys = HashSet::new();
    let mut cursor = Cursor::new(input);

    loop {
        let skipped = skip_whitespace_and_comments(cursor.rest());
        cursor.advance(skipped);

        let remaining = cursor.rest();
        if remaining.is_empty() {
            break;
        }

        if !remaining.starts_with('@') {
            // Text between entries is a comment in BibTeX
            match remaining.find('@') {
                Some(pos) => {
                    cursor.advance(pos);
                    continue;
                }
                None => break,
            }
        }

        let (line, column) = (cursor.line, cursor.column());
        let mut undefined = Vec::new();
        match parse_at_entry(remaining, &result.strings, &mut undefined) {
            Ok((rest, at_entry)) => {
                let context = match &at_entry {
                    AtEntry::Entry(entry, _) => format!(" in entry `{}`", entry.cite_key),
                    AtEntry::String(key, _) => format!(" in @string `{}`", key),
                    _ => String::new(),
                };
                for name in undefined {
                    result.errors.push(BibTeXParseError::new(
                        line,
                        column,
                        format!("undefined macro `{}`{}", name, context),
                    ));
                }
                match at_entry {
                    AtEntry::Entry(mut entry, duplicate_fields) => {
                        entry.line = line;
                        for field in duplicate_fields {
                            result.errors.push(BibTeXParseError::new(
                                line,
                                column,
                                format!("repeated field `{}` in entry `{}`", field, entry.cite_key),
                            ));
                        }
                        if seen_keys.insert(entry.cite_key.to_lowercase()) {
                            result.entries.push(entry);
                        } else {
                            result.errors.push(BibTeXParseError::new(
                                line,
                                column,
                                format!("repeated entry `{}`", entry.cite_key),
                            ));
                        }
                    }
                    AtEntry::String(key, value) => {
                        result.strings.insert(key.to_lowercase(), value);
                    }
                    AtEntry::Preamble(text) => {
                        result.preambles.push(text);
                    }
                    AtEntry::Comment => {}
                }
                cursor.advance(remaining.len() - rest.len());
            }
            Err(_) => {
                result.errors.push(BibTeXParseError::new(
                    line,
                    column,
                    format!("failed to parse entry `{}`", entry_head(remaining)),
                ));
                // Skip to next @ or end
                match remaining[1..].find('@') {
                    Some(pos) => cursor.advance(pos + 1),
                    None => break,
                }
            }
        }
    }

    result
}

/// Tracks the current offset together with its line and column
struct Cursor<'a> {
    input: &'a str,
    offset: usize,
    line: u32,
    line_start: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    fn advance(&mut self, len: usize) {
        let end = self.offset + len;
        for (i, b) in self.input.as_bytes()[self.offset..end].iter().enumerate() {
            if *b == b'\n' {
                self.line += 1;
                self.line_start = self.offset + i + 1;
            }
        }
        self.offset = end;
    }

    fn column(&self) -> u32 {
        self.input[self.line_start..self.offset].chars().count() as u32 + 1
    }
}

/// First line of an entry, shortened for error messages
fn entry_head(input: &str) -> String {
    let line = input.lines().next().unwrap_or("").trim();
    let mut head: String = line.chars().take(40).collect();
    if line.chars().count() > 40 {
        head.push_str("...");
    }
    head
}

/// Result of parsing an @ entry
enum AtEntry {
    /// Entry plus the names of fields it defined more than once
    Entry(BibTeXEntry, Vec<String>),
    String(String, String),
    Preamble(String),
    Comment,
}

/// Length of the leading whitespace and `%` comments
fn skip_whitespace_and_comments(input: &str) -> usize {
    let mut pos = 0;
    let bytes = input.as_bytes();

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
        } else if bytes[pos] == b'%' {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
        } else {
            break;
        }
    }

    pos
}

/// Parse an @ entry (entry, string, preamble, or comment)
fn parse_at_entry<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
    undefined: &mut Vec<String>,
) -> IResult<&'a str, AtEntry> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, entry_type) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;

    match entry_type.to_lowercase().as_str() {
        "string" => {
            let (rest, (key, value)) = parse_string_definition(rest, strings, undefined)?;
            Ok((rest, AtEntry::String(key, value)))
        }
        "preamble" => {
            let (rest, text) = parse_preamble(rest, strings, undefined)?;
            Ok((rest, AtEntry::Preamble(text)))
        }
        "comment" => {
            let (rest, _) = parse_comment_body(rest)?;
            Ok((rest, AtEntry::Comment))
        }
        _ => {
            let (rest, (entry, duplicates)) = parse_entry_body(rest, entry_type, strings, undefined)?;
            Ok((rest, AtEntry::Entry(entry, duplicates)))
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Parse a @string definition
fn parse_string_definition<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
    undefined: &mut Vec<String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_delimiter(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, key) = take_while1(is_name_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, strings, undefined)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    Ok((rest, (key.to_string(), value)))
}

/// Parse a @preamble
fn parse_preamble<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
    undefined: &mut Vec<String>,
) -> IResult<&'a str, String> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_delimiter(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, strings, undefined)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    Ok((rest, value))
}

/// Entries may be delimited by braces or parentheses; returns the closer
fn open_delimiter(input: &str) -> IResult<&str, char> {
    alt((
        map(char('{'), |_| '}'),
        map(char('('), |_| ')'),
    ))(input)
}

/// Parse a @comment body (skip everything in braces or to end of line)
fn parse_comment_body(input: &str) -> IResult<&str, ()> {
    let (rest, _) = multispace0(input)?;
    if rest.starts_with('{') {
        let (rest, _) = parse_braced_content(rest)?;
        Ok((rest, ()))
    } else {
        let pos = rest.find('\n').unwrap_or(rest.len());
        Ok((&rest[pos..], ()))
    }
}

/// Parse an entry body
fn parse_entry_body<'a>(
    input: &'a str,
    entry_type: &str,
    strings: &HashMap<String, String>,
    undefined: &mut Vec<String>,
) -> IResult<&'a str, (BibTeXEntry, Vec<String>)> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_delimiter(rest)?;
    let (rest, _) = multispace0(rest)?;

    let (rest, cite_key) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || "_-:./+".contains(c))(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = opt(char(','))(rest)?;

    let (rest, fields) = parse_fields(rest, close, strings, undefined)?;

    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    let mut entry = BibTeXEntry::new(cite_key, BibTeXEntryType::from_str(entry_type));
    let mut duplicates = Vec::new();
    for (key, value) in fields {
        if entry.has_field(&key) {
            duplicates.push(key.to_lowercase());
        } else {
            entry.add_field(key.to_lowercase(), value);
        }
    }

    Ok((rest, (entry, duplicates)))
}

/// Parse fields within an entry
fn parse_fields<'a>(
    input: &'a str,
    close: char,
    strings: &HashMap<String, String>,
    undefined: &mut Vec<String>,
) -> IResult<&'a str, Vec<(String, String)>> {
    let mut fields = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;

        if rest.starts_with(close) {
            return Ok((rest, fields));
        }

        match parse_single_field(rest, strings, undefined) {
            Ok((rest, (key, value))) => {
                fields.push((key, value));
                remaining = rest;

                let (rest, _) = multispace0(remaining)?;
                remaining = rest.strip_prefix(',').unwrap_or(rest);
            }
            Err(_) => {
                // The caller fails on whatever is left if it is not the closer
                return Ok((remaining, fields));
            }
        }
    }
}

/// Parse a single field (key = value)
fn parse_single_field<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
    undefined: &mut Vec<String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, key) = take_while1(is_name_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, strings, undefined)?;

    Ok((rest, (key.to_string(), value)))
}

/// Parse a field value (braced, quoted, number, or macro reference),
/// following `#` concatenations.
///
/// Macro names that expand to nothing known are pushed to `undefined` and
/// contribute no text.
fn parse_field_value<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
    undefined: &mut Vec<String>,
) -> IResult<&'a str, String> {
    let mut result = String::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;

        let literal = alt((
            parse_braced_value,
            parse_quoted_value,
            map(take_while1(|c: char| c.is_ascii_digit()), |s: &str| {
                s.to_string()
            }),
        ))(rest);
        let (rest, part) = match literal {
            Ok(parsed) => parsed,
            Err(_) => {
                let (rest, name) = take_while1(is_name_char)(rest)?;
                let value = expand_macro(name, strings).unwrap_or_else(|| {
                    undefined.push(name.to_string());
                    String::new()
                });
                (rest, value)
            }
        };

        result.push_str(&part);
        remaining = rest;

        let (rest, _) = multispace0(remaining)?;
        if let Some(stripped) = rest.strip_prefix('#') {
            remaining = stripped;
        } else {
            return Ok((rest, result));
        }
    }
}

/// Expand a macro reference from `@string` definitions or the month names
fn expand_macro(name: &str, strings: &HashMap<String, String>) -> Option<String> {
    strings
        .get(&name.to_lowercase())
        .cloned()
        .or_else(|| month_macro(name).map(str::to_string))
}

/// Parse a braced value {content}
fn parse_braced_value(input: &str) -> IResult<&str, String> {
    let (rest, content) = parse_braced_content(input)?;
    let inner = &content[1..content.len() - 1];
    Ok((rest, inner.to_string()))
}

/// Parse braced content including nested braces
fn parse_braced_content(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let mut depth = 0;
    let mut pos = 0;
    let bytes = input.as_bytes();

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..pos + 1]));
                }
            }
            b'\\' => {
                // Escaped brace does not count
                pos += 1;
            }
            _ => {}
        }
        pos += 1;
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Parse a quoted value "content"
fn parse_quoted_value(input: &str) -> IResult<&str, String> {
    if !input.starts_with('"') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let mut result = String::new();
    let mut brace_depth = 0u32;
    let mut chars = input.char_indices().skip(1);

    while let Some((pos, c)) = chars.next() {
        match c {
            '"' if brace_depth == 0 => {
                return Ok((&input[pos + 1..], result));
            }
            '{' => {
                brace_depth += 1;
                result.push(c);
            }
            '}' => {
                brace_depth = brace_depth.saturating_sub(1);
                result.push(c);
            }
            '\\' => {
                result.push(c);
                if let Some((_, escaped)) = chars.next() {
                    result.push(escaped);
                }
            }
            _ => result.push(c),
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}
