use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::MinTlsVersion;
use crate::constants::API_KEY_ENV_VAR;

/// Command-line arguments for the checksum uploader.
///
/// Uploads one file to an artifact repository with MD5, SHA-1 and SHA-256
/// checksum headers and verifies the server's answer.
#[derive(Parser, Debug)]
#[clap(
    name = "checksum-upload",
    version,
    about = "Upload a file over HTTPS with verified checksums",
    subcommand_negates_reqs = true
)]
pub struct Args {
    /// File to upload
    #[clap(required = true)]
    pub file: Option<PathBuf>,

    /// Destination URL (must be https://)
    #[clap(short, long, required = true)]
    pub url: Option<String>,

    /// Repository API key
    #[clap(short = 'k', long, env = API_KEY_ENV_VAR, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Upload without asking for confirmation
    #[clap(short, long)]
    pub force: bool,

    /// Path to configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Minimum TLS version, overriding the configuration file
    #[clap(long, value_enum)]
    pub min_tls: Option<MinTlsVersion>,

    /// Write a JSON summary of the upload to this file
    #[clap(long)]
    pub summary_json: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = "uploader.yaml")]
        path: PathBuf,
    },
}
