//! Remote repository upload plumbing.
//!
//! Turns a digest set into a PUT request, sends it once over HTTPS with the
//! file streamed from disk, and classifies what came back.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │ RequestAssembler│────▶│   Transport     │────▶│   validator     │
//! │  (headers, URL) │     │ (streamed PUT)  │     │ (201, SHA-256)  │
//! └─────────────────┘     └────────┬────────┘     └─────────────────┘
//!                                  │
//!                         ┌────────▼────────┐
//!                         │ Artifact server │
//!                         └─────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use checksum_uploader::cloud::{evaluate, HttpTransport, RequestAssembler, Transport};
//! use checksum_uploader::config::UploadConfig;
//! use checksum_uploader::models::SourceArtifact;
//! use checksum_uploader::utils::hash::compute_all;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = UploadConfig::default();
//! let artifact = SourceArtifact::resolve(Path::new("target/app.jar"))?;
//! let digests = compute_all(&artifact)?;
//!
//! let request = RequestAssembler::from_config(&config).build(
//!     "https://repo.example.com/artifactory/libs-release/app.jar",
//!     &digests,
//!     "api-key",
//!     &artifact,
//! )?;
//!
//! let transport = HttpTransport::new(&config)?;
//! let result = transport.send(request).await?;
//! println!("{}", evaluate(result, &digests));
//! # Ok(())
//! # }
//! ```

/// Request construction with integrity headers
pub mod request;

/// Single-attempt streamed HTTPS transport
pub mod transport;

/// Response interpretation and checksum cross-check
pub mod validator;

pub use request::RequestAssembler;
pub use transport::{HttpTransport, Transport};
pub use validator::evaluate;
