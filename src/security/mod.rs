//! Security utilities and validation functions.
//!
//! This module provides:
//! - Source and output path validation
//! - Credential scrubbing to keep the API key out of logs and summaries

pub mod credential_scrubber;
pub mod path_validator;

pub use credential_scrubber::{safe_error_message, scrub_credentials, scrub_secret};
pub use path_validator::{resolve_source_file, validate_output_path};
