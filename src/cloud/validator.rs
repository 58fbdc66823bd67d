use log::{debug, error, warn};

use crate::constants::UPLOAD_SUCCESS_STATUS;
use crate::models::{DigestSet, TransportCause, UploadOutcome, UploadResult};

/// Interpret a transport result against the locally computed digests.
///
/// Rules, in order:
/// 1. HTTP 201 is a tentative success;
/// 2. any other status is a transport failure carrying status and body;
/// 3. a server-reported SHA-256 that differs (ignoring case) from the local
///    one turns the tentative success into an integrity mismatch;
/// 4. no server checksum means success, since server-side verification is
///    best effort.
pub fn evaluate(result: UploadResult, local: &DigestSet) -> UploadOutcome {
    if result.status != UPLOAD_SUCCESS_STATUS {
        warn!("Upload rejected with HTTP {} after {:?}", result.status, result.elapsed);
        return UploadOutcome::TransportFailure {
            cause: TransportCause::Status {
                status: result.status,
                body: result.body,
                elapsed: result.elapsed,
            },
        };
    }

    match result.server_sha256.as_deref().map(str::trim) {
        Some(observed) if !observed.eq_ignore_ascii_case(&local.sha256) => {
            error!(
                "Server SHA-256 {} does not match local SHA-256 {}",
                observed, local.sha256
            );
            UploadOutcome::IntegrityMismatch {
                expected: local.sha256.clone(),
                observed: observed.to_string(),
            }
        }
        Some(_) => {
            debug!("Server SHA-256 matches local digest");
            UploadOutcome::Success { result }
        }
        None => {
            debug!("Server did not report a SHA-256; skipping cross-check");
            UploadOutcome::Success { result }
        }
    }
}
