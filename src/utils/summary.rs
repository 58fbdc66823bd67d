use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info, Level};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::{TransportCause, UploadOutcome};
use crate::pipeline::UploadReport;
use crate::security::credential_scrubber::scrub_secret;
use crate::security::path_validator::validate_output_path;

/// Maximum number of response body characters echoed into logs and summaries.
const MAX_BODY_CHARS: usize = 2048;

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_BODY_CHARS).collect();
        format!("{}... ({} bytes total)", head, body.len())
    }
}

/// Log a human-readable account of the outcome.
///
/// Integrity mismatches are logged at error level; other failures at warn.
pub fn log_outcome(report: &UploadReport, destination: &str, secret: &str) {
    for (level, line) in render_outcome(report, destination, secret) {
        log::log!(level, "{}", line);
    }
}

/// The lines `log_outcome` emits, with their levels. Secrets are scrubbed.
pub fn render_outcome(report: &UploadReport, destination: &str, secret: &str) -> Vec<(Level, String)> {
    let name = report
        .artifact
        .as_ref()
        .map(|a| a.display_name().to_string())
        .unwrap_or_else(|| "<unresolved>".to_string());
    let destination = scrub_secret(destination, secret);
    let mut lines = Vec::new();

    match &report.outcome {
        UploadOutcome::Success { result } => {
            lines.push((
                Level::Info,
                format!(
                    "Uploaded {} to {} (HTTP {}, {:?})",
                    name, destination, result.status, result.elapsed
                ),
            ));
            if let Some(digests) = &report.digests {
                for (algorithm, digest) in digests.iter() {
                    lines.push((Level::Info, format!("  {:<8} {}", algorithm.name(), digest)));
                }
            }
            if result.server_sha256.is_some() {
                lines.push((Level::Info, "  Server-side SHA-256 verified".to_string()));
            }
        }
        UploadOutcome::IntegrityMismatch { expected, observed } => {
            lines.push((
                Level::Error,
                format!("INTEGRITY MISMATCH uploading {} to {}", name, destination),
            ));
            lines.push((Level::Error, format!("  local SHA-256:  {}", expected)));
            lines.push((Level::Error, format!("  server SHA-256: {}", observed)));
            lines.push((
                Level::Error,
                "  The data was corrupted in transit; the stored artifact must not be trusted"
                    .to_string(),
            ));
        }
        UploadOutcome::TransportFailure { cause } => match cause {
            TransportCause::Network { message, elapsed } => {
                lines.push((
                    Level::Warn,
                    format!(
                        "Upload of {} to {} failed after {:?}: {}",
                        name,
                        destination,
                        elapsed,
                        scrub_secret(message, secret)
                    ),
                ));
            }
            TransportCause::Status { status, body, elapsed } => {
                lines.push((
                    Level::Warn,
                    format!(
                        "Upload of {} to {} rejected with HTTP {} after {:?}",
                        name, destination, status, elapsed
                    ),
                ));
                if !body.is_empty() {
                    lines.push((
                        Level::Warn,
                        format!("  response: {}", scrub_secret(&truncate_body(body), secret)),
                    ));
                }
            }
        },
        UploadOutcome::ValidationFailure { reason } => {
            lines.push((
                Level::Warn,
                format!("Upload not attempted: {}", scrub_secret(reason, secret)),
            ));
        }
        UploadOutcome::IoFailure { reason } => {
            lines.push((
                Level::Warn,
                format!("Could not read {}: {}", name, scrub_secret(reason, secret)),
            ));
        }
    }

    lines
}

/// Write the summary if one was requested and return the process exit code.
///
/// The exit code always follows the outcome. A summary that cannot be
/// written is logged and otherwise ignored.
pub fn finish_report(
    report: &UploadReport,
    summary_path: Option<&Path>,
    destination: &str,
    secret: &str,
) -> i32 {
    if let Some(path) = summary_path {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());
        let timestamp = Utc::now().to_rfc3339();

        let written = create_upload_summary(report, destination, secret, &hostname, &timestamp)
            .and_then(|json| write_upload_summary(path, &json));
        if let Err(e) = written {
            error!(
                "Upload summary not written: {}",
                scrub_secret(&format!("{:#}", e), secret)
            );
        }
    }

    report.outcome.exit_code()
}

/// Create a JSON summary of the upload.
///
/// # Example Output
///
/// ```json
/// {
///   "upload_id": "550e8400-e29b-41d4-a716-446655440000",
///   "hostname": "ci-runner-07",
///   "timestamp": "2024-01-15T14:30:52+00:00",
///   "outcome": "success",
///   "exit_code": 0,
///   "artifact": { "path": "...", "name": "app.jar", "size": 1024 },
///   "digests": { "md5": "...", "sha1": "...", "sha256": "..." },
///   "response": { "status": 201, "elapsed_ms": 84 }
/// }
/// ```
pub fn create_upload_summary(
    report: &UploadReport,
    destination: &str,
    secret: &str,
    hostname: &str,
    timestamp: &str,
) -> Result<String> {
    let artifact = report.artifact.as_ref().map(|a| {
        json!({
            "path": a.path().display().to_string(),
            "name": a.display_name(),
            "size": a.length(),
        })
    });

    let mut summary = json!({
        "upload_id": Uuid::new_v4().to_string(),
        "hostname": hostname,
        "timestamp": timestamp,
        "uploader_version": env!("CARGO_PKG_VERSION"),
        "destination": scrub_secret(destination, secret),
        "outcome": report.outcome.kind(),
        "exit_code": report.outcome.exit_code(),
        "stage": format!("{:?}", report.last_stage),
        "artifact": artifact,
        "digests": report.digests,
    });

    let details = match &report.outcome {
        UploadOutcome::Success { result } => json!({
            "response": {
                "status": result.status,
                "elapsed_ms": result.elapsed.as_millis() as u64,
                "server_sha256": result.server_sha256,
            }
        }),
        UploadOutcome::IntegrityMismatch { expected, observed } => json!({
            "integrity": { "expected_sha256": expected, "observed_sha256": observed }
        }),
        UploadOutcome::TransportFailure { cause } => json!({
            "response": {
                "status": cause.status(),
                "elapsed_ms": cause.elapsed().as_millis() as u64,
                "error": scrub_secret(&truncate_body(&failure_detail(cause)), secret),
            }
        }),
        UploadOutcome::ValidationFailure { reason } | UploadOutcome::IoFailure { reason } => {
            json!({ "error": scrub_secret(reason, secret) })
        }
    };

    if let (Some(obj), Value::Object(extra)) = (summary.as_object_mut(), details) {
        obj.extend(extra);
    }

    serde_json::to_string_pretty(&summary).context("Failed to serialize upload summary to JSON")
}

fn failure_detail(cause: &TransportCause) -> String {
    match cause {
        TransportCause::Network { message, .. } => message.clone(),
        TransportCause::Status { body, .. } => body.clone(),
    }
}

/// Write the summary JSON to `path`.
pub fn write_upload_summary(path: &Path, summary_json: &str) -> Result<()> {
    validate_output_path(path)?;
    fs::write(path, summary_json)
        .context(format!("Failed to write upload summary to {}", path.display()))?;
    info!("Upload summary written to {}", path.display());
    Ok(())
}
