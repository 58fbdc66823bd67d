//! The upload pipeline.
//!
//! ```text
//! Idle → Resolved → Hashing → Assembling → Uploading → terminal outcome
//! ```
//!
//! Every invocation ends in exactly one [`UploadOutcome`]; nothing is
//! retried. Hashing always completes before a request is built.

use std::path::PathBuf;

use log::{debug, info};

use crate::cloud::{evaluate, RequestAssembler, Transport};
use crate::error::UploadError;
use crate::models::{DigestSet, SourceArtifact, UploadOutcome};
use crate::utils::hash::compute_all;

/// Decides whether a resolved artifact may be uploaded.
///
/// The binary supplies an interactive prompt; `--force` and tests use
/// [`AutoApprove`].
pub trait ConfirmationPolicy: Send + Sync {
    fn confirm(&self, artifact: &SourceArtifact, destination: &str) -> bool;
}

/// Approves every upload without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl ConfirmationPolicy for AutoApprove {
    fn confirm(&self, _artifact: &SourceArtifact, _destination: &str) -> bool {
        true
    }
}

impl<F> ConfirmationPolicy for F
where
    F: Fn(&SourceArtifact, &str) -> bool + Send + Sync,
{
    fn confirm(&self, artifact: &SourceArtifact, destination: &str) -> bool {
        self(artifact, destination)
    }
}

/// Stages of a single upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Idle,
    Resolved,
    Hashing,
    Assembling,
    Uploading,
    Finished,
}

/// Inputs of one upload.
#[derive(Debug, Clone)]
pub struct UploadParams {
    pub source: PathBuf,
    pub destination: String,
    pub credential: String,
}

/// The outcome together with whatever was learned on the way.
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub artifact: Option<SourceArtifact>,
    pub digests: Option<DigestSet>,
    pub outcome: UploadOutcome,
    /// Stage the pipeline was in when the outcome was decided
    pub last_stage: UploadStage,
}

/// Drives one artifact through hashing, assembly, transport and validation.
pub struct Uploader<T: Transport> {
    transport: T,
    assembler: RequestAssembler,
}

impl<T: Transport> Uploader<T> {
    pub fn new(transport: T, assembler: RequestAssembler) -> Self {
        Self { transport, assembler }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run the whole pipeline once.
    pub async fn run(&self, params: &UploadParams, confirmation: &dyn ConfirmationPolicy) -> UploadReport {
        let mut report = UploadReport {
            artifact: None,
            digests: None,
            outcome: UploadOutcome::ValidationFailure {
                reason: "upload did not start".to_string(),
            },
            last_stage: UploadStage::Idle,
        };

        report.outcome = match self.execute(params, confirmation, &mut report).await {
            Ok(outcome) => outcome,
            Err(e) => e.into(),
        };

        info!(
            "Upload finished at stage {:?} with outcome {}",
            report.last_stage,
            report.outcome.kind()
        );
        report
    }

    async fn execute(
        &self,
        params: &UploadParams,
        confirmation: &dyn ConfirmationPolicy,
        report: &mut UploadReport,
    ) -> Result<UploadOutcome, UploadError> {
        self.assembler
            .validate_inputs(&params.destination, &params.credential)?;

        let artifact = SourceArtifact::resolve(&params.source)?;
        advance(report, UploadStage::Resolved);
        info!(
            "Resolved {} ({} bytes)",
            artifact.path().display(),
            artifact.length()
        );
        report.artifact = Some(artifact.clone());

        if !confirmation.confirm(&artifact, &params.destination) {
            return Err(UploadError::Validation(
                "upload not confirmed by operator".to_string(),
            ));
        }

        advance(report, UploadStage::Hashing);
        let to_hash = artifact.clone();
        let digests = tokio::task::spawn_blocking(move || compute_all(&to_hash))
            .await
            .map_err(|e| {
                UploadError::io(
                    artifact.path(),
                    std::io::Error::new(std::io::ErrorKind::Other, format!("digest task failed: {}", e)),
                )
            })??;
        report.digests = Some(digests.clone());

        advance(report, UploadStage::Assembling);
        let request = self
            .assembler
            .build(&params.destination, &digests, &params.credential, &artifact)?;

        advance(report, UploadStage::Uploading);
        let result = self.transport.send(request).await?;

        advance(report, UploadStage::Finished);
        Ok(evaluate(result, &digests))
    }
}

fn advance(report: &mut UploadReport, next: UploadStage) {
    debug!("Upload stage {:?} -> {:?}", report.last_stage, next);
    report.last_stage = next;
}
