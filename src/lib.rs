//! # checksum-uploader
//!
//! Uploads a local file to an artifact repository over HTTPS and proves,
//! with locally computed digests, that the server stored the bytes that were
//! read from disk.
//!
//! ## Overview
//!
//! One invocation uploads one file, exactly once:
//!
//! 1. the source path is resolved to a regular file;
//! 2. MD5, SHA-1 and SHA-256 are computed by three concurrent workers;
//! 3. a PUT request is assembled with `X-Checksum-*` headers and the API key;
//! 4. the file is streamed to the server without being buffered in memory;
//! 5. the response is classified: HTTP 201 plus an optional server SHA-256
//!    cross-check.
//!
//! The result is a single [`models::UploadOutcome`]. There are no retries.
//!
//! ## Usage
//!
//! ```no_run
//! use checksum_uploader::cloud::{HttpTransport, RequestAssembler};
//! use checksum_uploader::config::UploadConfig;
//! use checksum_uploader::pipeline::{AutoApprove, UploadParams, Uploader};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = UploadConfig::default();
//! let uploader = Uploader::new(
//!     HttpTransport::new(&config)?,
//!     RequestAssembler::from_config(&config),
//! );
//!
//! let params = UploadParams {
//!     source: "target/app-1.0.jar".into(),
//!     destination: "https://repo.example.com/artifactory/libs-release/app-1.0.jar".into(),
//!     credential: std::env::var("ARTIFACT_API_KEY")?,
//! };
//!
//! let report = uploader.run(&params, &AutoApprove).await;
//! std::process::exit(report.outcome.exit_code());
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions
//! - [`models`]: Artifact, digest, request and outcome types
//! - [`error`]: Classified pipeline failures
//! - [`pipeline`]: The upload state machine and confirmation policies
//! - [`cloud`]: Request assembly, HTTPS transport and response validation
//! - [`config`]: YAML configuration
//! - [`utils`]: Concurrent hashing and upload summaries
//! - [`security`]: Path validation and credential scrubbing
//! - [`constants`]: Header names, buffer sizes and exit codes

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models
pub mod models;

/// Classified failures of the upload pipeline
pub mod error;

/// Upload state machine
pub mod pipeline;

/// Utility functions for hashing and reporting
pub mod utils;

/// Request assembly, transport and response validation
pub mod cloud;

/// Configuration management
pub mod config;

/// Application constants
pub mod constants;

/// Security utilities for path validation and credential protection
pub mod security;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
