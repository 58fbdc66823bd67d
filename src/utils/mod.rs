//! Utility functions for the upload pipeline.
//!
//! ## Components
//!
//! - **Hashing**: concurrent MD5 / SHA-1 / SHA-256 calculation
//! - **Summary**: outcome logging and JSON upload summaries
//!
//! ### Generating File Digests
//!
//! ```no_run
//! use checksum_uploader::utils::hash::compute_file_digests;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let (digests, size) = compute_file_digests(Path::new("target/app.jar"))?;
//! println!("{} bytes, SHA-256 {}", size, digests.sha256);
//! # Ok(())
//! # }
//! ```

/// Concurrent multi-algorithm file digests
pub mod hash;

/// Outcome logging and JSON summaries
pub mod summary;
