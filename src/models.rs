use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::constants::{
    EXIT_INTEGRITY_MISMATCH, EXIT_IO_FAILURE, EXIT_SUCCESS, EXIT_TRANSPORT_FAILURE,
    EXIT_VALIDATION_FAILURE, HEADER_CHECKSUM_MD5, HEADER_CHECKSUM_SHA1, HEADER_CHECKSUM_SHA256,
};
use crate::error::UploadError;
use crate::security::path_validator::resolve_source_file;

/// A local file selected for upload.
///
/// Resolved once at start; the length and display name are captured at
/// resolution time and never refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArtifact {
    path: PathBuf,
    length: u64,
    display_name: String,
}

impl SourceArtifact {
    /// Resolve a path into an artifact.
    ///
    /// Fails with a validation error when the path does not exist or does not
    /// name a regular file.
    pub fn resolve(path: &Path) -> Result<Self, UploadError> {
        let resolved = resolve_source_file(path)?;
        let metadata = std::fs::metadata(&resolved).map_err(|e| {
            UploadError::Validation(format!("cannot stat {}: {}", path.display(), e))
        })?;

        let display_name = resolved
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| resolved.display().to_string());

        Ok(Self {
            path: resolved,
            length: metadata.len(),
            display_name,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Digest algorithms sent alongside every upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgorithm {
    /// Every algorithm, in the order workers are joined.
    pub const ALL: [HashAlgorithm; 3] = [HashAlgorithm::Md5, HashAlgorithm::Sha1, HashAlgorithm::Sha256];

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Sha256 => "SHA-256",
        }
    }

    /// Request header that carries this digest.
    pub fn header_name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => HEADER_CHECKSUM_MD5,
            HashAlgorithm::Sha1 => HEADER_CHECKSUM_SHA1,
            HashAlgorithm::Sha256 => HEADER_CHECKSUM_SHA256,
        }
    }

    /// Length of the lowercase hex encoding of a digest.
    pub fn hex_len(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 32,
            HashAlgorithm::Sha1 => 40,
            HashAlgorithm::Sha256 => 64,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase hex digests of one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestSet {
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
}

impl DigestSet {
    pub fn get(&self, algorithm: HashAlgorithm) -> &str {
        match algorithm {
            HashAlgorithm::Md5 => &self.md5,
            HashAlgorithm::Sha1 => &self.sha1,
            HashAlgorithm::Sha256 => &self.sha256,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (HashAlgorithm, &str)> {
        HashAlgorithm::ALL.into_iter().map(move |alg| (alg, self.get(alg)))
    }

    /// True when every digest is present, non-empty, lowercase hex and of the
    /// expected length.
    pub fn is_complete(&self) -> bool {
        self.iter().all(|(alg, digest)| {
            digest.len() == alg.hex_len()
                && digest.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        })
    }
}

/// Binding between a request and the artifact bytes it will stream.
///
/// Holds no open handle; the transport opens the file when it sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBody {
    pub path: PathBuf,
    pub length: u64,
}

/// A single request header. Sensitive values are hidden from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub name: String,
    pub value: String,
    pub sensitive: bool,
}

impl fmt::Debug for RequestHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.sensitive { "<REDACTED>" } else { self.value.as_str() };
        f.debug_struct("RequestHeader")
            .field("name", &self.name)
            .field("value", &value)
            .finish()
    }
}

/// Everything the transport needs for one PUT.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub destination: String,
    pub method: Method,
    pub headers: Vec<RequestHeader>,
    pub body: UploadBody,
}

impl UploadRequest {
    /// Look up a header value by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// What the server said about an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub status: u16,
    pub elapsed: Duration,
    pub server_sha256: Option<String>,
    pub body: String,
}

/// Why a transport attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCause {
    /// DNS, TLS, connection or timeout failure; no usable response.
    Network { message: String, elapsed: Duration },
    /// The server answered with something other than 201.
    Status { status: u16, body: String, elapsed: Duration },
}

impl TransportCause {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportCause::Network { .. } => None,
            TransportCause::Status { status, .. } => Some(*status),
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            TransportCause::Network { elapsed, .. } | TransportCause::Status { elapsed, .. } => *elapsed,
        }
    }
}

impl fmt::Display for TransportCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportCause::Network { message, elapsed } => {
                write!(f, "network error after {:?}: {}", elapsed, message)
            }
            TransportCause::Status { status, body, elapsed } => {
                write!(f, "server returned HTTP {} after {:?}: {}", status, elapsed, body)
            }
        }
    }
}

/// Terminal result of one upload invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success { result: UploadResult },
    IntegrityMismatch { expected: String, observed: String },
    TransportFailure { cause: TransportCause },
    ValidationFailure { reason: String },
    IoFailure { reason: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }

    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            UploadOutcome::Success { .. } => "success",
            UploadOutcome::IntegrityMismatch { .. } => "integrity_mismatch",
            UploadOutcome::TransportFailure { .. } => "transport_failure",
            UploadOutcome::ValidationFailure { .. } => "validation_failure",
            UploadOutcome::IoFailure { .. } => "io_failure",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            UploadOutcome::Success { .. } => EXIT_SUCCESS,
            UploadOutcome::IntegrityMismatch { .. } => EXIT_INTEGRITY_MISMATCH,
            UploadOutcome::TransportFailure { .. } => EXIT_TRANSPORT_FAILURE,
            UploadOutcome::ValidationFailure { .. } => EXIT_VALIDATION_FAILURE,
            UploadOutcome::IoFailure { .. } => EXIT_IO_FAILURE,
        }
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadOutcome::Success { result } => {
                write!(f, "upload succeeded with HTTP {} in {:?}", result.status, result.elapsed)
            }
            UploadOutcome::IntegrityMismatch { expected, observed } => write!(
                f,
                "integrity mismatch: local SHA-256 {} but server reported {}",
                expected, observed
            ),
            UploadOutcome::TransportFailure { cause } => write!(f, "transport failure: {}", cause),
            UploadOutcome::ValidationFailure { reason } => write!(f, "validation failure: {}", reason),
            UploadOutcome::IoFailure { reason } => write!(f, "I/O failure: {}", reason),
        }
    }
}
