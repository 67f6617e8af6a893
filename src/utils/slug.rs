//! File-name slugs from post titles.

use deunicode::deunicode;

/// Lowercase ASCII slug: transliterated, punctuation dropped, words joined
/// with single hyphens.
///
/// ```ignore
/// assert_eq!(slugify("Été à la mer!"), "ete-a-la-mer");
/// ```
pub fn slugify(text: &str) -> String {
    deunicode(text)
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
