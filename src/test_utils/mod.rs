//! Test utilities for the checksum uploader
//!
//! Temporary artifacts and well-known digest values shared by the unit
//! test modules.

#![cfg(test)]

use anyhow::Result;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

use crate::models::{DigestSet, SourceArtifact};

/// Creates a temporary file with the given content
pub fn create_temp_file(content: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content)?;
    file.flush()?;
    Ok(file)
}

/// Writes `content` to `artifact.bin` in a fresh directory and resolves it.
///
/// The directory is returned so the file outlives the test body.
pub fn artifact_from_bytes(content: &[u8]) -> (TempDir, SourceArtifact) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("artifact.bin");
    std::fs::write(&path, content).expect("failed to write artifact");
    let artifact = SourceArtifact::resolve(&path).expect("failed to resolve artifact");
    (dir, artifact)
}

/// Digests of the empty input
pub fn empty_digests() -> DigestSet {
    DigestSet {
        md5: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
        sha1: "da39a3ee5e6b4b0d3255bfef95601890afd80709".to_string(),
        sha256: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_temp_file() {
        let file = create_temp_file(b"hello").unwrap();
        assert_eq!(std::fs::read(file.path()).unwrap(), b"hello");
    }

    #[test]
    fn test_artifact_from_bytes() {
        let (_dir, artifact) = artifact_from_bytes(b"12345");
        assert_eq!(artifact.length(), 5);
        assert_eq!(artifact.display_name(), "artifact.bin");
    }

    #[test]
    fn test_empty_digests_complete() {
        assert!(empty_digests().is_complete());
    }
}
