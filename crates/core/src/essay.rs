//! Essay field validation, category constants, and draft-slug helpers.
//!
//! This module lives in `core` (zero internal deps) so it can be used by both
//! the API/repository layer and any future CLI tooling.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Category constants
// ---------------------------------------------------------------------------

pub const CATEGORY_THOUGHTS: &str = "thoughts";
pub const CATEGORY_MEDITATIONS: &str = "meditations";

/// All valid essay categories.
pub const VALID_CATEGORIES: &[&str] = &[CATEGORY_THOUGHTS, CATEGORY_MEDITATIONS];

// ---------------------------------------------------------------------------
// Slug suffix marker
// ---------------------------------------------------------------------------

/// Marker appended to a slug when a draft revision has to coexist with the
/// live final version under the same base slug. Live finals never carry it,
/// so exact-slug lookups stay unambiguous.
pub const DRAFT_SUFFIX: &str = "--";

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum slug length in characters (suffix included).
pub const MAX_SLUG_LEN: usize = 50;

/// Strip one trailing [`DRAFT_SUFFIX`] from a slug, if present.
pub fn base_slug(slug: &str) -> &str {
    slug.strip_suffix(DRAFT_SUFFIX).unwrap_or(slug)
}

/// Whether a slug carries the draft suffix marker.
pub fn is_suffixed(slug: &str) -> bool {
    slug.ends_with(DRAFT_SUFFIX)
}

/// Append the draft suffix to a base slug.
pub fn suffixed_slug(base: &str) -> String {
    format!("{base}{DRAFT_SUFFIX}")
}

// ---------------------------------------------------------------------------
// Default title
// ---------------------------------------------------------------------------

/// Title assigned when the author submits none: `"Post #<n+1>"` where `n` is
/// the number of distinct base slugs already persisted, excluding private
/// in-progress drafts (suffixed slugs).
pub fn default_title(existing_count: i64) -> String {
    format!("Post #{}", existing_count + 1)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an essay title (non-empty, <= 100 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an essay category against the known set.
pub fn validate_category(cat: &str) -> Result<(), CoreError> {
    if !VALID_CATEGORIES.contains(&cat) {
        return Err(CoreError::Validation(format!(
            "Invalid category '{}'. Valid categories: {}",
            cat,
            VALID_CATEGORIES.join(", ")
        )));
    }
    Ok(())
}

/// Validate a slug (non-empty, <= 50 chars, charset plus optional suffix).
///
/// Slugs are always generated internally; this guards repository inputs
/// against malformed values reaching a query.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    let base = base_slug(slug);
    if !base
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(CoreError::Validation(
            "Slug must contain only ASCII letters, digits, and underscores".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
