use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{debug, info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

use checksum_uploader::cli::{Args, Commands};
use checksum_uploader::cloud::{HttpTransport, RequestAssembler};
use checksum_uploader::config::{load_or_default_config, UploadConfig};
use checksum_uploader::constants::{API_KEY_ENV_VAR, EXIT_INTERNAL_ERROR, EXIT_SUCCESS};
use checksum_uploader::models::SourceArtifact;
use checksum_uploader::pipeline::{AutoApprove, ConfirmationPolicy, UploadParams, Uploader};
use checksum_uploader::security::{safe_error_message, scrub_credentials, validate_output_path};
use checksum_uploader::utils::summary;

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", safe_error_message("checksum-upload failed", &format!("{:#}", e)));
            EXIT_INTERNAL_ERROR
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let args = Args::parse();

    initialize_logging(args.verbose)?;

    if let Some(cmd) = &args.command {
        handle_subcommand(cmd)?;
        return Ok(EXIT_SUCCESS);
    }

    let config = load_and_override_config(&args)?;
    let params = upload_params(&args)?;
    if let Some(path) = &args.summary_json {
        validate_output_path(path)?;
    }

    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;
    let transport = HttpTransport::new(&config)?;
    let uploader = Uploader::new(transport, RequestAssembler::from_config(&config));

    let report = if args.force {
        debug!("--force given, skipping confirmation");
        runtime.block_on(uploader.run(&params, &AutoApprove))
    } else {
        runtime.block_on(uploader.run(&params, &PromptConfirmation))
    };

    summary::log_outcome(&report, &params.destination, &params.credential);
    Ok(summary::finish_report(
        &report,
        args.summary_json.as_deref(),
        &params.destination,
        &params.credential,
    ))
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

fn handle_subcommand(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::InitConfig { path } => {
            info!("Creating default configuration file at {}", path.display());
            UploadConfig::create_default_config_file(path)?;
            info!("Configuration created successfully");
            Ok(())
        }
    }
}

/// Load configuration and apply command-line overrides
fn load_and_override_config(args: &Args) -> Result<UploadConfig> {
    let mut config = load_or_default_config(args.config.as_deref())?;
    if let Some(min_tls) = args.min_tls {
        debug!("Minimum TLS version overridden to {}", min_tls);
        config.min_tls_version = min_tls;
    }
    Ok(config)
}

fn upload_params(args: &Args) -> Result<UploadParams> {
    let source = args.file.clone().ok_or_else(|| anyhow!("No file to upload was given"))?;
    let destination = args.url.clone().ok_or_else(|| anyhow!("No destination URL was given"))?;

    // An absent key is passed through empty so the pipeline reports it as a
    // validation failure with its own exit code.
    let credential = args.api_key.clone().unwrap_or_else(|| {
        warn!("No API key given via --api-key or {}", API_KEY_ENV_VAR);
        String::new()
    });

    Ok(UploadParams {
        source,
        destination,
        credential,
    })
}

/// Asks the operator on the terminal before uploading.
///
/// Declines when stdin is not a terminal, so unattended runs must pass
/// `--force`.
struct PromptConfirmation;

impl ConfirmationPolicy for PromptConfirmation {
    fn confirm(&self, artifact: &SourceArtifact, destination: &str) -> bool {
        let stdin = io::stdin();
        if !stdin.is_terminal() {
            warn!("stdin is not a terminal; use --force to upload without confirmation");
            return false;
        }

        print!(
            "Upload {} ({} bytes) to {}? [y/N] ",
            artifact.display_name(),
            artifact.length(),
            scrub_credentials(destination)
        );
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match stdin.lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}
