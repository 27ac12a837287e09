//! Paragraph formatting for essay content display.

/// Wrap each newline-separated segment of `text` in `<p>...</p>` and
/// concatenate them in input order, with no separator.
///
/// No HTML escaping is performed; callers rendering untrusted content must
/// escape it before (or instead of) using this. Re-applying the function to
/// its own output nests the markup rather than round-tripping.
pub fn format_paragraphs(text: &str) -> String {
    text.split('\n')
        .map(|segment| format!("<p>{segment}</p>"))
        .collect()
}
