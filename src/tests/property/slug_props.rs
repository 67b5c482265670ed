//! Property-based tests for title slugs

use proptest::prelude::*;

use crate::core::rumors::rumor_id_for;
use crate::core::slug::{slugify, slugify_non_empty};

proptest! {
    #[test]
    fn slug_uses_only_safe_characters(title in "\\PC{0,60}") {
        let slug = slugify(&title);
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn slug_has_no_stray_hyphens(title in "\\PC{0,60}") {
        let slug = slugify(&title);
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }

    #[test]
    fn slug_is_idempotent(title in "\\PC{0,60}") {
        let once = slugify(&title);
        prop_assert_eq!(slugify(&once), once);
    }

    #[test]
    fn non_empty_slug_matches_slugify(title in "\\PC{0,60}") {
        match slugify_non_empty(&title) {
            Some(slug) => prop_assert_eq!(slug, slugify(&title)),
            None => prop_assert!(slugify(&title).is_empty()),
        }
    }

    #[test]
    fn rumor_id_is_never_empty(title in "[ !?.,-]{0,10}|[A-Za-z ]{1,20}") {
        prop_assert!(!rumor_id_for(&title).is_empty());
    }
}
