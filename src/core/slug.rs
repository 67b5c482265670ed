//! Title normalization
//!
//! Rumor and quest ids are derived from their titles: lowercased, every run
//! of characters outside `[a-z0-9]` collapsed to a single hyphen, and
//! leading/trailing hyphens removed. Two titles that normalize to the same
//! slug share an id; the later write replaces the earlier record.

use std::sync::OnceLock;

use regex::Regex;

static NON_ALPHANUMERIC: OnceLock<Regex> = OnceLock::new();

fn non_alphanumeric() -> &'static Regex {
    NON_ALPHANUMERIC.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static pattern is valid"))
}

/// Derive an id from a title.
///
/// Returns an empty string when the title has no ASCII alphanumerics.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    non_alphanumeric()
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Derive an id from a title, or `None` when nothing usable remains.
pub fn slugify_non_empty(title: &str) -> Option<String> {
    let slug = slugify(title);
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}
