//! BibTeX author-list parsing
//!
//! Splits an `author` field into names and each name into its
//! First / von / Last / Jr parts, following the three forms BibTeX accepts:
//! `First von Last`, `von Last, First` and `von Last, Jr, First`.
//! Splitting only happens at brace depth 0, so `{Barnes and Noble}` stays a
//! single name.

/// A name that does not fit any of the BibTeX name forms
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("name `{0}` has no last name")]
    MissingLastName(String),
    #[error("too many commas in name `{0}`")]
    TooManyCommas(String),
}

/// One author (or editor) name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonName {
    pub first: String,
    pub von: String,
    pub last: String,
    pub jr: String,
}

impl PersonName {
    pub fn new(
        first: impl Into<String>,
        von: impl Into<String>,
        last: impl Into<String>,
        jr: impl Into<String>,
    ) -> Self {
        Self {
            first: first.into(),
            von: von.into(),
            last: last.into(),
            jr: jr.into(),
        }
    }

    /// The `others` marker that truncates a list to "et al."
    pub fn others() -> Self {
        Self::new("", "", "others", "")
    }

    pub fn is_others(&self) -> bool {
        self.last == "others" && self.first.is_empty() && self.von.is_empty() && self.jr.is_empty()
    }
}

/// Split an author field on the word `and` at brace depth 0.
///
/// Whitespace inside each name is collapsed to single spaces.
pub fn split_authors(author_field: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for token in tokenize(author_field, |c| c.is_whitespace(), false) {
        if token.eq_ignore_ascii_case("and") {
            if !current.is_empty() {
                names.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(token);
        }
    }
    if !current.is_empty() {
        names.push(current.join(" "));
    }

    names
}

/// Parse every name of an author field, skipping malformed names.
///
/// Use [`try_parse_names`] to find out which names are malformed.
pub fn parse_names(author_field: &str) -> Vec<PersonName> {
    split_authors(author_field)
        .iter()
        .filter_map(|name| parse_name(name).ok().flatten())
        .collect()
}

/// Parse every name of an author field, failing on the first malformed one
pub fn try_parse_names(author_field: &str) -> Result<Vec<PersonName>, NameError> {
    let mut names = Vec::new();
    for name in split_authors(author_field) {
        if let Some(parsed) = parse_name(&name)? {
            names.push(parsed);
        }
    }
    Ok(names)
}

fn parse_name(name: &str) -> Result<Option<PersonName>, NameError> {
    // Comma parts are positional, so empty ones are kept
    let parts: Vec<String> = tokenize(name, |c| c == ',', true)
        .into_iter()
        .map(|part| part.trim().to_string())
        .collect();

    let (von_last, jr, first) = match parts.as_slice() {
        [] => return Ok(None),
        [whole] => {
            let tokens = name_tokens(whole);
            if tokens.is_empty() {
                return Ok(None);
            }
            if tokens.len() == 1 && tokens[0] == "others" {
                return Ok(Some(PersonName::others()));
            }
            return Ok(Some(first_von_last(&tokens)));
        }
        [von_last, first] => (von_last, "", first),
        [von_last, jr, first] => (von_last, jr.as_str(), first),
        _ => return Err(NameError::TooManyCommas(name.to_string())),
    };

    let (von, last) = split_von_last(&name_tokens(von_last));
    if last.is_empty() {
        return Err(NameError::MissingLastName(name.to_string()));
    }
    Ok(Some(PersonName::new(first.as_str(), von, last, jr)))
}

/// `First von Last`: von starts at the first lowercase token and ends at
/// the last lowercase token before the final one.
fn first_von_last(tokens: &[String]) -> PersonName {
    let last_index = tokens.len() - 1;
    let von_start = tokens[..last_index]
        .iter()
        .position(|t| starts_lowercase(t));

    match von_start {
        Some(start) => {
            let von_end = (start..last_index)
                .rev()
                .find(|&i| starts_lowercase(&tokens[i]))
                .unwrap_or(start);
            PersonName::new(
                tokens[..start].join(" "),
                tokens[start..=von_end].join(" "),
                tokens[von_end + 1..].join(" "),
                "",
            )
        }
        None => PersonName::new(
            tokens[..last_index].join(" "),
            "",
            tokens[last_index].as_str(),
            "",
        ),
    }
}

/// `von Last`: the last token always belongs to Last.
fn split_von_last(tokens: &[String]) -> (String, String) {
    if tokens.is_empty() {
        return (String::new(), String::new());
    }
    let last_index = tokens.len() - 1;
    match (0..last_index).rev().find(|&i| starts_lowercase(&tokens[i])) {
        Some(von_end) => (
            tokens[..=von_end].join(" "),
            tokens[von_end + 1..].join(" "),
        ),
        None => (String::new(), tokens.join(" ")),
    }
}

fn name_tokens(part: &str) -> Vec<String> {
    tokenize(part, |c| c.is_whitespace() || c == '~', false)
}

/// Split at brace depth 0 on separator characters
fn tokenize(input: &str, is_separator: impl Fn(char) -> bool, keep_empty: bool) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0u32;
    let mut escaped = false;

    for c in input.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                current.push(c);
            }
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if depth == 0 && is_separator(c) => {
                if keep_empty || !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if keep_empty || !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Commands that stand for a letter themselves (`{\o}`, `\ss`, ...)
const LETTER_COMMANDS: &[&str] = &["i", "j", "o", "O", "l", "L", "ae", "AE", "oe", "OE", "aa", "AA", "ss"];

/// Whether a name token starts with a lowercase letter.
///
/// Letters inside an ordinary brace group do not count (the group is
/// "caseless" and the token is not a von particle). Special characters such
/// as `{\"u}` or `\'e` count by the letter they decorate.
fn starts_lowercase(token: &str) -> bool {
    let chars: Vec<char> = token.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '{' if chars.get(i + 1) == Some(&'\\') => return special_char_is_lowercase(&chars[i + 2..]),
            '{' => return false,
            '\\' => return special_char_is_lowercase(&chars[i + 1..]),
            c if c.is_alphabetic() => return c.is_lowercase(),
            _ => i += 1,
        }
    }

    false
}

/// Case of a control sequence with the backslash already consumed
fn special_char_is_lowercase(chars: &[char]) -> bool {
    let command: String = chars.iter().take_while(|c| c.is_ascii_alphabetic()).collect();

    if command.is_empty() {
        // Accent symbol such as \" or \': decide by the decorated letter
        return chars
            .iter()
            .skip(1)
            .find(|c| c.is_alphabetic())
            .is_some_and(|c| c.is_lowercase());
    }
    if LETTER_COMMANDS.contains(&command.as_str()) {
        return command.starts_with(|c: char| c.is_lowercase());
    }

    // Letter accents such as \c c or \v{s}
    chars[command.chars().count()..]
        .iter()
        .find(|c| c.is_alphabetic())
        .is_some_and(|c| c.is_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(first: &str, von: &str, last: &str, jr: &str) -> PersonName {
        PersonName::new(first, von, last, jr)
    }

    #[test]
    fn test_split_authors() {
        assert_eq!(
            split_authors("Smith, John and Doe, Jane"),
            vec!["Smith, John", "Doe, Jane"]
        );
        assert_eq!(
            split_authors("A. Author\n    AND B. Author"),
            vec!["A. Author", "B. Author"]
        );
        assert_eq!(
            split_authors("{Barnes and Noble} and Alexander Anderson"),
            vec!["{Barnes and Noble}", "Alexander Anderson"]
        );
    }

    #[test]
    fn test_first_last() {
        assert_eq!(parse_names("John Smith"), vec![name("John", "", "Smith", "")]);
        assert_eq!(parse_names("J. Smith"), vec![name("J.", "", "Smith", "")]);
        assert_eq!(
            parse_names("John Paul Jones"),
            vec![name("John Paul", "", "Jones", "")]
        );
        assert_eq!(parse_names("Plato"), vec![name("", "", "Plato", "")]);
    }

    #[test]
    fn test_first_von_last() {
        assert_eq!(
            parse_names("Ludwig van Beethoven"),
            vec![name("Ludwig", "van", "Beethoven", "")]
        );
        assert_eq!(
            parse_names("Jean de la Fontaine"),
            vec![name("Jean", "de la", "Fontaine", "")]
        );
        assert_eq!(
            parse_names("Vincent~van~Gogh"),
            vec![name("Vincent", "van", "Gogh", "")]
        );
    }

    #[test]
    fn test_comma_forms() {
        assert_eq!(
            parse_names("van Beethoven, Ludwig"),
            vec![name("Ludwig", "van", "Beethoven", "")]
        );
        assert_eq!(
            parse_names("Smith, Jr., John"),
            vec![name("John", "", "Smith", "Jr.")]
        );
        assert_eq!(
            parse_names("de la Vall{\\'e}e Poussin, Charles Louis"),
            vec![name("Charles Louis", "de la", "Vall{\\'e}e Poussin", "")]
        );
    }

    #[test]
    fn test_special_characters_decide_case() {
        assert_eq!(
            parse_names("{\\\"U}lrich {\\\"O}zt{\\\"u}rk"),
            vec![name("{\\\"U}lrich", "", "{\\\"O}zt{\\\"u}rk", "")]
        );
        assert_eq!(
            parse_names("Hans {\\\"u}ber Meyer"),
            vec![name("Hans", "{\\\"u}ber", "Meyer", "")]
        );
        assert_eq!(
            parse_names("Jens {\\O}stergaard"),
            vec![name("Jens", "", "{\\O}stergaard", "")]
        );
    }

    #[test]
    fn test_braced_group_is_not_von() {
        assert_eq!(
            parse_names("{the Cochrane Collaboration}"),
            vec![name("", "", "{the Cochrane Collaboration}", "")]
        );
        assert_eq!(
            parse_names("Maria {de Souza}"),
            vec![name("Maria", "", "{de Souza}", "")]
        );
    }

    #[test]
    fn test_others_marker() {
        let names = parse_names("Alice Adams and Bob Brown and others");
        assert_eq!(names.len(), 3);
        assert!(!names[1].is_others());
        assert!(names[2].is_others());
    }

    #[test]
    fn test_comma_parts_are_positional() {
        assert_eq!(
            try_parse_names(", John"),
            Err(NameError::MissingLastName(", John".to_string()))
        );
        assert_eq!(
            try_parse_names("Doe, J. and , John"),
            Err(NameError::MissingLastName(", John".to_string()))
        );
        assert_eq!(parse_names(", John and Doe, J."), vec![name("J.", "", "Doe", "")]);
        assert_eq!(parse_names("Smith,"), vec![name("", "", "Smith", "")]);
    }

    #[test]
    fn test_too_many_commas() {
        assert_eq!(
            try_parse_names("Smith, Jr., John, Extra"),
            Err(NameError::TooManyCommas("Smith, Jr., John, Extra".to_string()))
        );
    }

    #[test]
    fn test_try_parse_names_accepts_valid_lists() {
        assert_eq!(
            try_parse_names("Smith, Jr., John and others").unwrap(),
            vec![name("John", "", "Smith", "Jr."), PersonName::others()]
        );
    }

    #[test]
    fn test_empty_field() {
        assert!(parse_names("").is_empty());
        assert!(parse_names("   ").is_empty());
    }
}
