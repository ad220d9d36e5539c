//! URL validation for the job producer
//!
//! The worker pool assumes every submitted URL has already passed this
//! filter; invalid input lines are skipped (and logged) before submission.

use url::Url;

/// Returns true if the string is an absolute http(s) URL with a host.
///
/// # Example
///
/// ```
/// use pagepulse::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/page"));
/// assert!(!is_valid_url("not-a-url"));
/// ```
pub fn is_valid_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}
