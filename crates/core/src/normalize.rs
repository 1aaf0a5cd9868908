//! Canonical forms for identifiers and free-text venue names.
//!
//! Every function here is total: any input, including the empty string,
//! produces a (possibly empty) string.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static YEAR_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").expect("static regex"));

/// Canonicalize an ISSN: keep digits and `X`, uppercased.
///
/// `"1758-4078"`, `"17584078"` and `" 1758-4078 "` all map to `"17584078"`.
pub fn normalize_issn(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'x' || *c == 'X')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Two identifiers are equal iff their normalized forms match.
pub fn issn_eq(a: &str, b: &str) -> bool {
    normalize_issn(a) == normalize_issn(b)
}

/// Render an identifier in the `NNNN-NNNN` form, if it has eight characters.
pub fn hyphenate_issn(raw: &str) -> Option<String> {
    let digits = normalize_issn(raw);
    if digits.len() == 8 {
        Some(format!("{}-{}", &digits[..4], &digits[4..]))
    } else {
        None
    }
}

/// Canonicalize a venue or title string for cache keys and length comparison.
///
/// Lower-cases, drops punctuation, collapses whitespace runs and trims.
pub fn normalize_name(raw: &str) -> String {
    let stripped: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    collapse_whitespace(&stripped)
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove standalone four-digit tokens (years) from a container title.
pub fn strip_year_tokens(raw: &str) -> String {
    collapse_whitespace(&YEAR_TOKEN.replace_all(raw, ""))
}
