//! Validation of URLs submitted for shortening.
//!
//! URLs are checked but never rewritten: the stored URL is exactly the
//! submitted one, so its fingerprint stays stable across requests.

use url::Url;

/// Maximum accepted URL length in bytes.
pub const MAX_URL_LEN: usize = 2048;

/// Reasons a submitted URL is rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TargetUrlError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL is longer than {MAX_URL_LEN} bytes")]
    TooLong,

    /// Control characters or surrounding whitespace would be dropped by the
    /// parser but kept in the stored URL, which then cannot be sent as a
    /// `Location` header.
    #[error("URL must not contain control characters or surrounding whitespace")]
    ControlCharacters,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Checks that `input` is an absolute HTTP(S) URL of acceptable length.
///
/// # Errors
///
/// See [`TargetUrlError`] for the rejection reasons.
///
/// # Examples
///
/// ```
/// use hashlink::utils::target_url::validate_target_url;
///
/// assert!(validate_target_url("https://example.com").is_ok());
/// assert!(validate_target_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_target_url(input: &str) -> Result<(), TargetUrlError> {
    if input.trim().is_empty() {
        return Err(TargetUrlError::Empty);
    }

    if input.len() > MAX_URL_LEN {
        return Err(TargetUrlError::TooLong);
    }

    if input.chars().any(char::is_control) || input.trim() != input {
        return Err(TargetUrlError::ControlCharacters);
    }

    let url = Url::parse(input).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(TargetUrlError::UnsupportedProtocol),
    }
}
