//! Title casing for BibTeX titles
//!
//! Capitalizes the first letter of every word except minor words, works on
//! the raw TeX value and leaves brace-protected text and control sequences
//! alone. Existing capitals are never lowered, so titles that are already
//! in title case come back unchanged.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    /// Articles, conjunctions and short prepositions kept lowercase
    static ref MINOR_WORDS: HashSet<&'static str> = [
        "a", "an", "the",
        "and", "but", "for", "nor", "or", "so", "yet",
        "as", "at", "by", "from", "in", "into", "of", "off", "on",
        "onto", "over", "per", "to", "up", "upon", "via", "vs", "with",
    ]
    .into_iter()
    .collect();
}

/// Characters that may precede the first letter of a word
const OPENING_PUNCTUATION: &[char] = &['(', '[', '"', '\'', '`'];

/// Apply title case to a raw (TeX) title
pub fn title_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut word = String::new();
    let mut depth = 0u32;
    let mut word_depth = 0u32;
    let mut capitalize_next = true;

    for c in input.chars() {
        if c.is_whitespace() {
            if !word.is_empty() {
                result.push_str(&case_word(&word, word_depth, capitalize_next));
                capitalize_next = word.ends_with(':');
                depth = track_depth(&word, word_depth);
                word.clear();
            }
            result.push(c);
        } else {
            if word.is_empty() {
                word_depth = depth;
            }
            word.push(c);
        }
    }
    if !word.is_empty() {
        result.push_str(&case_word(&word, word_depth, capitalize_next));
    }

    result
}

fn case_word(word: &str, depth: u32, force: bool) -> String {
    if depth > 0 {
        return word.to_string();
    }

    let prefix_len: usize = word
        .chars()
        .take_while(|c| OPENING_PUNCTUATION.contains(c))
        .map(char::len_utf8)
        .sum();
    let (prefix, rest) = word.split_at(prefix_len);

    let mut chars = rest.chars();
    let Some(first) = chars.next() else {
        return word.to_string();
    };
    if !first.is_lowercase() {
        // Covers `{`, `\` and words that already start with a capital
        return word.to_string();
    }
    // Mixed-case words such as iOS or eBay
    if chars.as_str().chars().any(char::is_uppercase) {
        return word.to_string();
    }
    if !force && is_minor(rest) {
        return word.to_string();
    }

    let mut cased = String::with_capacity(word.len());
    cased.push_str(prefix);
    cased.extend(first.to_uppercase());
    cased.push_str(chars.as_str());
    cased
}

fn is_minor(word: &str) -> bool {
    let bare = word.trim_end_matches(|c: char| !c.is_alphanumeric());
    MINOR_WORDS.contains(bare.to_lowercase().as_str())
}

/// Brace depth after `word`, given the depth it started at
fn track_depth(word: &str, start: u32) -> u32 {
    let mut depth = start;
    let mut escaped = false;
    for c in word.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth
}
