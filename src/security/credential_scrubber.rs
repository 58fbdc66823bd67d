//! Credential scrubbing for diagnostics.
//!
//! Server bodies, destination URLs and error messages can echo the API key
//! back at us. Everything that is logged or written to the summary passes
//! through here first.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex patterns for detecting various types of credentials
    static ref CREDENTIAL_PATTERNS: Vec<(Regex, &'static str)> = vec![
        // Artifactory API key header echoed in bodies or debug output
        (Regex::new(r"(?i)(x-jfrog-art-api)\s*[:=]\s*([^\s,;]+)").unwrap(),
         "$1=<REDACTED_API_KEY>"),

        // Generic API keys
        (Regex::new(r"(?i)(api[_-]?key|apikey)\s*[:=]\s*([A-Za-z0-9\-_]{8,})").unwrap(),
         "$1=<REDACTED_API_KEY>"),

        // Generic passwords
        (Regex::new(r"(?i)(password|passwd|pwd)\s*[:=]\s*([^\s]+)").unwrap(),
         "$1=<REDACTED_PASSWORD>"),

        // Bearer tokens
        (Regex::new(r"(?i)(bearer|authorization)\s*[:=]\s*(bearer\s+)?([A-Za-z0-9\-._~+/]+=*)").unwrap(),
         "$1=<REDACTED_TOKEN>"),

        // Generic tokens
        (Regex::new(r"(?i)(token|access[_-]?token|auth[_-]?token)\s*[:=]\s*([A-Za-z0-9\-._~+/]{20,})").unwrap(),
         "$1=<REDACTED_TOKEN>"),

        // Basic auth in URLs
        (Regex::new(r"(https?://)([^:/@\s]+):([^@\s]+)@").unwrap(),
         "$1<REDACTED_USER>:<REDACTED_PASS>@"),
    ];
}

/// Scrub credentials from a string.
///
/// # Example
///
/// ```
/// use checksum_uploader::security::credential_scrubber::scrub_credentials;
///
/// let input = "PUT failed: password=secret123";
/// let scrubbed = scrub_credentials(input);
/// assert_eq!(scrubbed, "PUT failed: password=<REDACTED_PASSWORD>");
/// ```
pub fn scrub_credentials(input: &str) -> String {
    let mut result = input.to_string();

    for (pattern, replacement) in CREDENTIAL_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).to_string();
    }

    result
}

/// Scrub patterns and additionally every literal occurrence of `secret`.
///
/// The configured API key is opaque, so pattern matching alone cannot be
/// trusted to catch it.
pub fn scrub_secret(input: &str, secret: &str) -> String {
    let scrubbed = scrub_credentials(input);
    let secret = secret.trim();
    if secret.is_empty() {
        scrubbed
    } else {
        scrubbed.replace(secret, "<REDACTED_API_KEY>")
    }
}

/// Create a safe error message that scrubs credentials.
pub fn safe_error_message(context: &str, error: &impl std::fmt::Display) -> String {
    let raw_message = format!("{}: {}", context, error);
    scrub_credentials(&raw_message)
}
