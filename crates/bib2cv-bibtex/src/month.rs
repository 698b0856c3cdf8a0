//! Month field interpretation

use chrono::Month;

/// Interpret a BibTeX `month` value.
///
/// Accepts a number (`1`-`12`), an English month name or its three-letter
/// abbreviation, in any case and with an optional trailing period.
pub fn parse_month(value: &str) -> Option<Month> {
    let value = value.trim().trim_end_matches('.').trim();
    if value.is_empty() {
        return None;
    }

    if value.chars().all(|c| c.is_ascii_digit()) {
        let number: u8 = value.parse().ok()?;
        return Month::try_from(number).ok();
    }

    value.parse::<Month>().ok()
}

/// Expansion of the predefined BibTeX month macros (`jan` ... `dec`)
pub(crate) fn month_macro(name: &str) -> Option<&'static str> {
    let expanded = match name.to_ascii_lowercase().as_str() {
        "jan" => "January",
        "feb" => "February",
        "mar" => "March",
        "apr" => "April",
        "may" => "May",
        "jun" => "June",
        "jul" => "July",
        "aug" => "August",
        "sep" => "September",
        "oct" => "October",
        "nov" => "November",
        "dec" => "December",
        _ => return None,
    };
    Some(expanded)
}
