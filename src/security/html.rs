//! HTML entity escaping.
//!
//! Text is stored raw in a [`Post`](crate::post::Post) and escaped exactly
//! once, at render time. [`unescape`] reverses it when a document is resumed.

use std::borrow::Cow;

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content and attribute values.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape_text("<script>"), "&lt;script&gt;");
/// assert_eq!(escape_text("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Unescape HTML entities back to characters.
///
/// Handles the entities [`escape_text`] produces plus `&apos;`, `&nbsp;`
/// and numeric references. Unknown entities are kept verbatim.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        // Entities are short; anything longer is literal text.
        let Some(semi) = after.find(';').filter(|&i| i > 0 && i <= 10) else {
            result.push('&');
            rest = after;
            continue;
        };

        let entity = &after[..semi];
        match decode_entity(entity) {
            Some(c) => result.push(c),
            None => {
                result.push('&');
                result.push_str(entity);
                result.push(';');
            }
        }
        rest = &after[semi + 1..];
    }

    result.push_str(rest);
    Cow::Owned(result)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        s if s.starts_with("#x") || s.starts_with("#X") => {
            u32::from_str_radix(&s[2..], 16).ok().and_then(char::from_u32)
        }
        s if s.starts_with('#') => s[1..].parse().ok().and_then(char::from_u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_script_tag() {
        let escaped = escape_text("<script>alert('x')</script>");
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert_eq!(
            escaped,
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_borrows_clean_text() {
        assert!(matches!(escape_text("plain words"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_is_not_idempotent() {
        // Escaping twice double-encodes; render paths must escape once.
        let once = escape_text("a & b");
        let twice = escape_text(&once);
        assert_eq!(once, "a &amp; b");
        assert_eq!(twice, "a &amp;amp; b");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        let raw = "Tom & Jerry say \"<hi>\" & 'bye'";
        assert_eq!(unescape(&escape_text(raw)), raw);
    }

    #[test]
    fn test_unescape_numeric_and_unknown() {
        assert_eq!(unescape("&#233;t&#xE9;"), "été");
        assert_eq!(unescape("&copy; 2024"), "&copy; 2024");
        assert_eq!(unescape("fish & chips"), "fish & chips");
    }

    #[test]
    fn test_unescape_non_ascii_around_entities() {
        assert_eq!(unescape("Précédent &lt; Suivant"), "Précédent < Suivant");
    }
}
