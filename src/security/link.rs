//! Link target validation.

use url::Url;

use crate::error::{PostError, Result};

/// Schemes a link block may point at.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Validate a user-supplied link target.
///
/// Absolute URLs must use one of [`ALLOWED_SCHEMES`]; relative references
/// (`./contact`, `/about`, `#top`) are accepted as-is. Returns the trimmed
/// target.
pub fn validate_link_url(raw: &str) -> Result<&str> {
    let target = raw.trim();
    if target.is_empty() {
        return Err(PostError::validation("link url is empty"));
    }
    if target.chars().any(char::is_control) {
        return Err(PostError::validation("link url contains control characters"));
    }

    match Url::parse(target) {
        Ok(url) if ALLOWED_SCHEMES.contains(&url.scheme()) => Ok(target),
        Ok(url) => Err(PostError::validation(format!(
            "link scheme `{}` is not allowed (use http, https or mailto)",
            url.scheme()
        ))),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(target),
        Err(e) => Err(PostError::validation(format!("invalid link url `{target}`: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_and_mailto_accepted() {
        assert_eq!(validate_link_url(" https://example.com/a ").unwrap(), "https://example.com/a");
        assert!(validate_link_url("mailto:me@example.com").is_ok());
    }

    #[test]
    fn test_relative_accepted() {
        assert!(validate_link_url("./contact").is_ok());
        assert!(validate_link_url("/about").is_ok());
        assert!(validate_link_url("#top").is_ok());
    }

    #[test]
    fn test_script_scheme_rejected() {
        let err = validate_link_url("javascript:alert(1)").unwrap_err();
        assert!(err.to_string().contains("javascript"));
        assert!(validate_link_url("data:text/html,hi").is_err());
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            validate_link_url("   "),
            Err(PostError::Validation(_))
        ));
    }
}
