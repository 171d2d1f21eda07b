//! City slug normalization.
//!
//! Every lookup goes through [`normalize`] so user input like
//! `"New York_NY "` and the stored key `"new-york-ny"` meet in the
//! middle.

use std::sync::OnceLock;

use regex::Regex;

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[_\s]+").expect("literal pattern"))
}

fn disallowed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9-]").expect("literal pattern"))
}

fn hyphen_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-{2,}").expect("literal pattern"))
}

fn canonical() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*-[a-z]{2}$").expect("literal pattern"))
}

/// Normalizes free-form input into slug form: whitespace and
/// underscores become single hyphens, everything outside
/// `[a-zA-Z0-9-]` is dropped, and the result is lowercased with edge
/// hyphens trimmed.
///
/// # Examples
///
/// ```
/// assert_eq!(relo_data::slug::normalize("New York_NY "), "new-york-ny");
/// assert_eq!(relo_data::slug::normalize("St. Louis, MO"), "st-louis-mo");
/// ```
pub fn normalize(input: &str) -> String {
    let hyphenated = separators().replace_all(input.trim(), "-");
    let cleaned = disallowed().replace_all(&hyphenated, "");
    let collapsed = hyphen_runs().replace_all(&cleaned, "-");
    collapsed.to_lowercase().trim_matches('-').to_string()
}

/// Whether a slug is in the canonical `city-st` form the reference
/// data uses: lowercase hyphenated words ending in a two-letter state
/// code.
pub fn is_canonical_city_slug(slug: &str) -> bool {
    canonical().is_match(slug)
}
