//! Path validation for the files the uploader reads and writes.
//!
//! The source artifact must be an existing regular file at resolution time;
//! summary output must not land in system directories.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::error::UploadError;

/// Resolve the file to upload into a canonical path.
///
/// # Arguments
///
/// * `path` - The path given on the command line
///
/// # Returns
///
/// * `Ok(PathBuf)` - The canonicalized path of a regular file
/// * `Err(UploadError::Validation)` - If the path is missing, is a directory,
///   is not a regular file, or contains null bytes
pub fn resolve_source_file(path: &Path) -> Result<PathBuf, UploadError> {
    if path.as_os_str().is_empty() {
        return Err(UploadError::Validation("source path is empty".to_string()));
    }

    if let Some(path_str) = path.to_str() {
        if path_str.contains('\0') {
            return Err(UploadError::Validation("source path contains null bytes".to_string()));
        }
    }

    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            UploadError::Validation(format!("source file does not exist: {}", path.display()))
        }
        _ => UploadError::Validation(format!("cannot access {}: {}", path.display(), e)),
    })?;

    if metadata.is_dir() {
        return Err(UploadError::Validation(format!(
            "source path is a directory, not a file: {}",
            path.display()
        )));
    }

    if !metadata.is_file() {
        return Err(UploadError::Validation(format!(
            "source path is not a regular file: {}",
            path.display()
        )));
    }

    path.canonicalize().map_err(|e| {
        UploadError::Validation(format!("cannot canonicalize {}: {}", path.display(), e))
    })
}

/// Validates that a path is safe for writing the upload summary.
///
/// # Returns
///
/// * `Ok(())` - If the path is safe for output
/// * `Err` - If the path points into a system directory or a read-only parent
pub fn validate_output_path(path: &Path) -> Result<()> {
    let path_str = path.to_string_lossy().to_lowercase();

    let dangerous_paths = [
        "/etc",
        "/sys",
        "/proc",
        "/dev",
        "/boot",
        "c:\\windows",
        "c:\\program files",
        "c:\\programdata",
        "/system",
        "/library",
        "/usr",
    ];

    for dangerous in dangerous_paths {
        if path_str.starts_with(dangerous) {
            return Err(anyhow!(
                "Cannot write to system directory: {}",
                path.display()
            ));
        }
    }

    if path.is_dir() {
        return Err(anyhow!("Summary path is a directory: {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        if parent.exists() && parent.metadata()?.permissions().readonly() {
            return Err(anyhow!(
                "Parent directory is read-only: {}",
                parent.display()
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("artifact.jar");
        std::fs::write(&file, b"payload").unwrap();

        let resolved = resolve_source_file(&file).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved.file_name().unwrap(), "artifact.jar");
    }

    #[test]
    fn test_resolve_relative_components() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("sub")).unwrap();
        std::fs::write(temp_dir.path().join("artifact.bin"), b"x").unwrap();

        let indirect = temp_dir.path().join("sub").join("..").join("artifact.bin");
        let resolved = resolve_source_file(&indirect).unwrap();
        assert_eq!(resolved, temp_dir.path().join("artifact.bin").canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_missing_file() {
        let err = resolve_source_file(Path::new("/nonexistent/dir/file.bin")).unwrap_err();
        match err {
            UploadError::Validation(reason) => assert!(reason.contains("does not exist")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = resolve_source_file(temp_dir.path()).unwrap_err();
        match err {
            UploadError::Validation(reason) => assert!(reason.contains("is a directory")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_empty_and_null_paths() {
        assert!(matches!(
            resolve_source_file(Path::new("")),
            Err(UploadError::Validation(_))
        ));
        assert!(matches!(
            resolve_source_file(Path::new("file\0name")),
            Err(UploadError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_output_path() {
        assert!(validate_output_path(Path::new("/etc/upload-summary.json")).is_err());
        assert!(validate_output_path(Path::new("/sys/kernel")).is_err());
        assert!(validate_output_path(Path::new("C:\\Windows\\System32\\summary.json")).is_err());

        let temp_dir = TempDir::new().unwrap();
        assert!(validate_output_path(&temp_dir.path().join("summary.json")).is_ok());
        assert!(validate_output_path(temp_dir.path()).is_err());
    }
}
