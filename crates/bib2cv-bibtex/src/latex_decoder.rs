//! LaTeX markup to plain text
//!
//! Decodes accents, special characters and symbols to Unicode, drops
//! formatting commands (keeping their argument), and strips the braces and
//! inline-math dollars that only matter to TeX.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

// Escaped delimiters and decoded characters with a TeX meaning are parked
// in the private use area until commands, braces and dollars are gone.
const LBRACE: char = '\u{E000}';
const RBRACE: char = '\u{E001}';
const DOLLAR: char = '\u{E002}';
const BACKSLASH: char = '\u{E003}';
const TILDE: char = '\u{E004}';

/// Convert a LaTeX-marked-up field value to plain text
pub fn tex_to_plain(input: &str) -> String {
    let mut result = input
        .replace("\\{", &LBRACE.to_string())
        .replace("\\}", &RBRACE.to_string())
        .replace("\\$", &DOLLAR.to_string());

    result = decode_accents(&result);
    result = decode_symbols(&result);
    result = remove_tex_commands(&result);
    result = result.chars().filter(|c| !matches!(c, '{' | '}' | '$')).collect();

    for (pattern, replacement) in PUNCTUATION {
        result = result.replace(pattern, replacement);
    }

    result
        .chars()
        .map(|c| match c {
            LBRACE => '{',
            RBRACE => '}',
            DOLLAR => '$',
            BACKSLASH => '\\',
            TILDE => '~',
            c => c,
        })
        .collect()
}

// ===== Accents =====

/// Combining mark for each accent command
fn combining_mark(command: &str) -> Option<char> {
    let mark = match command {
        "\"" => '\u{0308}',
        "'" => '\u{0301}',
        "`" => '\u{0300}',
        "^" => '\u{0302}',
        "~" => '\u{0303}',
        "=" => '\u{0304}',
        "." => '\u{0307}',
        "c" => '\u{0327}',
        "v" => '\u{030C}',
        "u" => '\u{0306}',
        "H" => '\u{030B}',
        "k" => '\u{0328}',
        "r" => '\u{030A}',
        "d" => '\u{0323}',
        _ => return None,
    };
    Some(mark)
}

lazy_static! {
    // \"u, \"{u}, \'{\i}
    static ref SYMBOL_ACCENT: Regex =
        Regex::new(r#"\\(["'`^~=.])\s*(?:\{(\\[ij]|[A-Za-z])\}|(\\[ij]|[A-Za-z]))"#).unwrap();

    // \c c, \v{s}; a space or brace is required so \upsilon is not an accent
    static ref LETTER_ACCENT: Regex =
        Regex::new(r"\\([cvuHkrd])(?:\s*\{(\\[ij]|[A-Za-z])\}|\s+([A-Za-z]))").unwrap();
}

fn decode_accents(input: &str) -> String {
    let compose = |caps: &Captures| -> String {
        let base = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
        // Accented dotless i is just an accented i
        let base = base.trim_start_matches('\\');
        match combining_mark(&caps[1]) {
            Some(mark) => format!("{base}{mark}").nfc().collect(),
            None => caps[0].to_string(),
        }
    };

    let result = SYMBOL_ACCENT.replace_all(input, compose);
    LETTER_ACCENT.replace_all(&result, compose).into_owned()
}

// ===== Symbols =====

lazy_static! {
    /// Control words that stand for a single character or symbol
    static ref SYMBOLS: HashMap<&'static str, &'static str> = HashMap::from([
        // Letters and ligatures
        ("i", "ı"), ("j", "ȷ"),
        ("o", "ø"), ("O", "Ø"),
        ("l", "ł"), ("L", "Ł"),
        ("aa", "å"), ("AA", "Å"),
        ("ae", "æ"), ("AE", "Æ"),
        ("oe", "œ"), ("OE", "Œ"),
        ("ss", "ß"),

        // Text symbols
        ("textasciitilde", "\u{E004}"),
        ("textbackslash", "\u{E003}"),
        ("copyright", "©"),
        ("texttrademark", "™"),
        ("textregistered", "®"),
        ("pounds", "£"),
        ("euro", "€"),
        ("S", "§"),
        ("P", "¶"),
        ("dag", "†"),
        ("ddag", "‡"),
        ("textbullet", "•"),
        ("ldots", "…"),
        ("dots", "…"),
        ("textellipsis", "…"),
        ("textendash", "–"),
        ("textemdash", "—"),

        // Greek letters
        ("alpha", "α"), ("beta", "β"), ("gamma", "γ"),
        ("delta", "δ"), ("epsilon", "ε"), ("zeta", "ζ"),
        ("eta", "η"), ("theta", "θ"), ("iota", "ι"),
        ("kappa", "κ"), ("lambda", "λ"), ("mu", "μ"),
        ("nu", "ν"), ("xi", "ξ"), ("pi", "π"),
        ("rho", "ρ"), ("sigma", "σ"), ("tau", "τ"),
        ("upsilon", "υ"), ("phi", "φ"), ("chi", "χ"),
        ("psi", "ψ"), ("omega", "ω"),
        ("Gamma", "Γ"), ("Delta", "Δ"), ("Theta", "Θ"),
        ("Lambda", "Λ"), ("Xi", "Ξ"), ("Pi", "Π"),
        ("Sigma", "Σ"), ("Upsilon", "Υ"), ("Phi", "Φ"),
        ("Psi", "Ψ"), ("Omega", "Ω"),

        // Math operators and relations
        ("times", "×"), ("div", "÷"),
        ("pm", "±"), ("mp", "∓"),
        ("cdot", "·"), ("ast", "∗"),
        ("leq", "≤"), ("geq", "≥"),
        ("le", "≤"), ("ge", "≥"),
        ("neq", "≠"), ("approx", "≈"),
        ("equiv", "≡"), ("sim", "∼"),
        ("propto", "∝"), ("ll", "≪"), ("gg", "≫"),
        ("in", "∈"), ("subset", "⊂"), ("cup", "∪"), ("cap", "∩"),
        ("to", "→"), ("rightarrow", "→"), ("leftarrow", "←"),
        ("Rightarrow", "⇒"), ("Leftrightarrow", "⇔"),
        ("infty", "∞"), ("partial", "∂"), ("nabla", "∇"),
        ("sum", "∑"), ("prod", "∏"), ("int", "∫"), ("sqrt", "√"),
    ]);

    static ref CONTROL_WORD: Regex = Regex::new(r"\\([A-Za-z]+)").unwrap();
    static ref CONTROL_SYMBOL: Regex = Regex::new(r"\\([&%#_ ,;!])").unwrap();
}

fn decode_symbols(input: &str) -> String {
    let result = CONTROL_WORD.replace_all(input, |caps: &Captures| {
        SYMBOLS
            .get(&caps[1])
            .map_or_else(|| caps[0].to_string(), |s| s.to_string())
    });

    CONTROL_SYMBOL
        .replace_all(&result, |caps: &Captures| match &caps[1] {
            // Spacing commands
            " " | "," | ";" | "!" => " ".to_string(),
            other => other.to_string(),
        })
        .into_owned()
}

// ===== TeX Command Removal =====

lazy_static! {
    // Any remaining command with a braced argument keeps its argument
    static ref COMMAND_WITH_ARGUMENT: Regex = Regex::new(r"\\[a-zA-Z]+\*?\s*\{([^{}]*)\}").unwrap();

    // Commands without an argument (\relax, \bf, \/) disappear
    static ref BARE_COMMAND: Regex = Regex::new(r"\\(?:[a-zA-Z]+\s?|/)").unwrap();
}

fn remove_tex_commands(input: &str) -> String {
    let mut result = input.to_string();

    // Innermost commands first; nested commands need several passes
    loop {
        let next = COMMAND_WITH_ARGUMENT.replace_all(&result, "$1").into_owned();
        if next == result {
            break;
        }
        result = next;
    }

    BARE_COMMAND.replace_all(&result, "").into_owned()
}

// ===== Punctuation =====

const PUNCTUATION: &[(&str, &str)] = &[
    ("---", "—"),
    ("--", "–"),
    ("``", "\u{201C}"),
    ("''", "\u{201D}"),
    ("`", "\u{2018}"),
    ("~", " "),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_umlaut_decoding() {
        assert_eq!(tex_to_plain(r#"M\"uller"#), "Müller");
        assert_eq!(tex_to_plain(r#"M\"{u}ller"#), "Müller");
        assert_eq!(tex_to_plain(r#"M{\"u}ller"#), "Müller");
    }

    #[test]
    fn test_acute_accent() {
        assert_eq!(tex_to_plain(r#"caf\'e"#), "café");
        assert_eq!(tex_to_plain(r#"Garc\'{\i}a"#), "García");
    }

    #[test]
    fn test_grave_and_circumflex() {
        assert_eq!(tex_to_plain(r#"\`a la carte"#), "à la carte");
        assert_eq!(tex_to_plain(r#"h\^otel"#), "hôtel");
    }

    #[test]
    fn test_letter_accents() {
        assert_eq!(tex_to_plain(r#"gar\c con"#), "garçon");
        assert_eq!(tex_to_plain(r#"\v{S}koda"#), "Škoda");
        assert_eq!(tex_to_plain(r#"Erd\H{o}s"#), "Erdős");
    }

    #[test]
    fn test_tilde_accent_and_nbsp() {
        assert_eq!(tex_to_plain(r#"ma\~nana"#), "mañana");
        assert_eq!(tex_to_plain("J.~Smith"), "J. Smith");
    }

    #[test]
    fn test_letter_commands() {
        assert_eq!(tex_to_plain(r#"{\O}stergaard"#), "Østergaard");
        assert_eq!(tex_to_plain(r#"Stra{\ss}e"#), "Straße");
        assert_eq!(tex_to_plain(r#"\L{}\'od\'z"#), "Łódź");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(tex_to_plain(r#"10\% off"#), "10% off");
        assert_eq!(tex_to_plain(r#"Smith \& Jones"#), "Smith & Jones");
        assert_eq!(tex_to_plain(r#"Cost is \$100"#), "Cost is $100");
    }

    #[test]
    fn test_text_symbols_survive() {
        assert_eq!(tex_to_plain(r"C:\textbackslash{}dir"), r"C:\dir");
        assert_eq!(tex_to_plain(r"and \textbackslash"), r"and \");
        assert_eq!(tex_to_plain(r"\textasciitilde{}user"), "~user");
        assert_eq!(tex_to_plain(r"$10^{6}$ stars"), "10^6 stars");
    }

    #[test]
    fn test_dashes() {
        assert_eq!(tex_to_plain("pages 1--10"), "pages 1–10");
        assert_eq!(tex_to_plain("the---as usual"), "the—as usual");
    }

    #[test]
    fn test_greek_and_math() {
        assert_eq!(tex_to_plain(r#"\alpha particles"#), "α particles");
        assert_eq!(tex_to_plain(r#"The $\Gamma$ function"#), "The Γ function");
        assert_eq!(tex_to_plain(r#"$a \leq b$"#), "a ≤ b");
    }

    #[test]
    fn test_tex_command_removal() {
        assert_eq!(tex_to_plain(r#"\textbf{bold}"#), "bold");
        assert_eq!(tex_to_plain(r#"\emph{italic} text"#), "italic text");
        assert_eq!(tex_to_plain(r#"\textbf{\emph{both}}"#), "both");
        assert_eq!(tex_to_plain(r#"{\relax Plain}"#), "Plain");
    }

    #[test]
    fn test_brace_stripping() {
        assert_eq!(tex_to_plain("{DNA} Repair"), "DNA Repair");
        assert_eq!(tex_to_plain("test{}"), "test");
        assert_eq!(tex_to_plain(r#"Set \{x\}"#), "Set {x}");
    }

    #[test]
    fn test_complex_example() {
        let input = r#"M\"uller, J. and Garc\'{\i}a, M."#;
        assert_eq!(tex_to_plain(input), "Müller, J. and García, M.");
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(tex_to_plain("J. Smith"), "J. Smith");
        assert_eq!(tex_to_plain("Great Results"), "Great Results");
    }
}
