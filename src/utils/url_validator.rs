//! Target URL validation.
//!
//! A target must be an absolute URL with a hierarchical part (scheme followed
//! by `//authority` or a path). The string is checked but never rewritten, so
//! a resolved link always redirects to exactly what was submitted.

use url::Url;

/// Errors that can occur during target validation.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL must not contain control characters")]
    ControlCharacter,

    #[error("URL must not contain leading or trailing whitespace")]
    SurroundingWhitespace,

    #[error("URL must be absolute, got a non-hierarchical '{0}:' URL")]
    NotHierarchical(String),
}

/// Checks that `input` is a well-formed absolute URL.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] when parsing fails (including
/// relative references such as `/path` or plain words).
/// Returns [`UrlValidationError::ControlCharacter`] for embedded tabs, line
/// breaks and other control characters, which the parser would otherwise
/// strip silently.
/// Returns [`UrlValidationError::NotHierarchical`] for `mailto:`, `data:`,
/// `javascript:` and similar.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_target("http://example.com/path").is_ok());
/// assert!(validate_target("not a url").is_err());
/// ```
pub fn validate_target(input: &str) -> Result<(), UrlValidationError> {
    // Stored targets become `Location` headers verbatim.
    if input.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    if input.trim() != input {
        return Err(UrlValidationError::SurroundingWhitespace);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if url.cannot_be_a_base() {
        return Err(UrlValidationError::NotHierarchical(url.scheme().to_string()));
    }

    Ok(())
}
