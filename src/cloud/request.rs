use log::debug;
use reqwest::header::HeaderValue;
use reqwest::{Method, Url};

use crate::config::UploadConfig;
use crate::constants::{DEFAULT_API_KEY_HEADER, SECURE_SCHEME_PREFIX};
use crate::error::UploadError;
use crate::models::{DigestSet, RequestHeader, SourceArtifact, UploadBody, UploadRequest};

/// Builds the PUT request descriptor for an artifact.
///
/// Construction is pure: nothing is opened and nothing is sent.
#[derive(Debug, Clone)]
pub struct RequestAssembler {
    api_key_header: String,
}

impl Default for RequestAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_HEADER)
    }
}

impl RequestAssembler {
    pub fn new(api_key_header: impl Into<String>) -> Self {
        Self {
            api_key_header: api_key_header.into(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.api_key_header.clone())
    }

    pub fn api_key_header(&self) -> &str {
        &self.api_key_header
    }

    /// Check destination and credential without touching the artifact.
    ///
    /// Lets callers reject bad input before any file or network I/O.
    pub fn validate_inputs(&self, destination: &str, credential: &str) -> Result<(), UploadError> {
        validate_destination(destination)?;
        validate_credential(credential)?;
        Ok(())
    }

    /// Assemble an upload request.
    ///
    /// # Errors
    ///
    /// `UploadError::Validation` when the destination is not an `https://`
    /// URL with a host, when the credential is empty or not a legal header
    /// value, or when the digest set is incomplete.
    pub fn build(
        &self,
        destination: &str,
        digests: &DigestSet,
        credential: &str,
        artifact: &SourceArtifact,
    ) -> Result<UploadRequest, UploadError> {
        let destination = validate_destination(destination)?;
        let credential = validate_credential(credential)?;

        if !digests.is_complete() {
            return Err(UploadError::Validation(
                "digest set is incomplete; refusing to assemble request".to_string(),
            ));
        }

        let mut headers: Vec<RequestHeader> = digests
            .iter()
            .map(|(algorithm, digest)| RequestHeader {
                name: algorithm.header_name().to_string(),
                value: digest.to_string(),
                sensitive: false,
            })
            .collect();

        headers.push(RequestHeader {
            name: self.api_key_header.clone(),
            value: credential.to_string(),
            sensitive: true,
        });

        debug!(
            "Assembled PUT {} for {} ({} bytes)",
            destination,
            artifact.display_name(),
            artifact.length()
        );

        Ok(UploadRequest {
            destination,
            method: Method::PUT,
            headers,
            body: UploadBody {
                path: artifact.path().to_path_buf(),
                length: artifact.length(),
            },
        })
    }
}

/// Require an absolute `https://` URL with a host.
fn validate_destination(destination: &str) -> Result<String, UploadError> {
    let destination = destination.trim();

    let secure = destination
        .get(..SECURE_SCHEME_PREFIX.len())
        .map_or(false, |scheme| scheme.eq_ignore_ascii_case(SECURE_SCHEME_PREFIX));
    if !secure {
        return Err(UploadError::Validation(format!(
            "destination must use {}: {}",
            SECURE_SCHEME_PREFIX, destination
        )));
    }

    let url = Url::parse(destination)
        .map_err(|e| UploadError::Validation(format!("invalid destination URL: {}", e)))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UploadError::Validation("destination URL has no host".to_string()));
    }

    Ok(url.to_string())
}

fn validate_credential(credential: &str) -> Result<&str, UploadError> {
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(UploadError::Validation("API credential is empty".to_string()));
    }
    if HeaderValue::from_str(credential).is_err() {
        return Err(UploadError::Validation(
            "API credential contains characters not allowed in a header".to_string(),
        ));
    }
    Ok(credential)
}
