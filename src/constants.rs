//! Global constants for the checksum uploader.
//!
//! Wire-level header names, buffer sizes and process exit codes live here so
//! the pipeline, the binary and the tests agree on a single definition.

// Buffer size constants
/// Read buffer used by each digest worker (1MB)
pub const DIGEST_BUFFER_SIZE: usize = 1024 * 1024;

/// Chunk size for streaming the artifact body to the socket (64KB)
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

// Wire protocol constants
/// Request header carrying the MD5 digest of the body
pub const HEADER_CHECKSUM_MD5: &str = "X-Checksum-Md5";

/// Request header carrying the SHA-1 digest of the body
pub const HEADER_CHECKSUM_SHA1: &str = "X-Checksum-Sha1";

/// Request header carrying the SHA-256 digest of the body
pub const HEADER_CHECKSUM_SHA256: &str = "X-Checksum-Sha256";

/// Default header carrying the repository API key
pub const DEFAULT_API_KEY_HEADER: &str = "X-JFrog-Art-Api";

/// Default response header in which the server reports its own SHA-256
pub const DEFAULT_SERVER_CHECKSUM_HEADER: &str = "X-Checksum-Sha256";

/// The only status code accepted as a successful upload
pub const UPLOAD_SUCCESS_STATUS: u16 = 201;

/// Scheme every destination must use
pub const SECURE_SCHEME_PREFIX: &str = "https://";

/// Environment variable consulted when `--api-key` is not given
pub const API_KEY_ENV_VAR: &str = "ARTIFACT_API_KEY";

// Exit codes
/// Upload succeeded and all checks passed
pub const EXIT_SUCCESS: i32 = 0;

/// Failure outside the upload pipeline (config, logging, runtime)
pub const EXIT_INTERNAL_ERROR: i32 = 1;

/// Command-line usage error. Reserved for clap, which exits with 2 on its own.
pub const EXIT_USAGE_ERROR: i32 = 2;

/// Bad input rejected before any I/O
pub const EXIT_VALIDATION_FAILURE: i32 = 3;

/// Source file could not be read for digesting
pub const EXIT_IO_FAILURE: i32 = 4;

/// Network failure or unexpected HTTP status
pub const EXIT_TRANSPORT_FAILURE: i32 = 5;

/// Server-reported checksum disagrees with the local one
pub const EXIT_INTEGRITY_MISMATCH: i32 = 6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_sizes() {
        assert_eq!(DIGEST_BUFFER_SIZE, 1024 * 1024);
        assert!(STREAM_CHUNK_SIZE <= DIGEST_BUFFER_SIZE);
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_INTERNAL_ERROR,
            EXIT_USAGE_ERROR,
            EXIT_VALIDATION_FAILURE,
            EXIT_IO_FAILURE,
            EXIT_TRANSPORT_FAILURE,
            EXIT_INTEGRITY_MISMATCH,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_checksum_headers() {
        assert_eq!(HEADER_CHECKSUM_MD5, "X-Checksum-Md5");
        assert_eq!(HEADER_CHECKSUM_SHA1, "X-Checksum-Sha1");
        assert_eq!(HEADER_CHECKSUM_SHA256, "X-Checksum-Sha256");
    }
}
