use std::error::Error as StdError;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::{HeaderName, CONTENT_LENGTH};
use reqwest::{Body, Client};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

#[cfg(test)]
use mockall::automock;

use crate::config::UploadConfig;
use crate::error::UploadError;
use crate::models::{TransportCause, UploadRequest, UploadResult};
use crate::security::credential_scrubber::scrub_secret;

/// Performs exactly one upload attempt.
///
/// Implementations return `Ok` for any HTTP response, whatever its status;
/// only failures to obtain a response are errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: UploadRequest) -> Result<UploadResult, UploadError>;
}

/// HTTPS transport streaming the artifact straight from the file handle.
pub struct HttpTransport {
    client: Client,
    server_checksum_header: HeaderName,
    chunk_size: usize,
}

impl HttpTransport {
    /// Create a transport from configuration.
    ///
    /// The minimum TLS version is fixed here for the life of the client.
    pub fn new(config: &UploadConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .min_tls_version(config.min_tls_version.as_reqwest())
            .user_agent(config.user_agent.as_str());

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().context("Failed to create HTTP client")?;
        let server_checksum_header = HeaderName::from_bytes(config.server_checksum_header.as_bytes())
            .context(format!(
                "Invalid server checksum header: {}",
                config.server_checksum_header
            ))?;

        debug!(
            "HTTP transport ready (min TLS {}, timeout {:?})",
            config.min_tls_version,
            config.timeout()
        );

        Ok(Self {
            client,
            server_checksum_header,
            chunk_size: config.stream_chunk_size.max(1),
        })
    }
}

/// Render an error together with its source chain.
fn describe_error(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn classify_reqwest_error(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_body() {
        "failed while streaming request body"
    } else if err.is_decode() {
        "failed to read response"
    } else {
        "request failed"
    }
}

fn network_failure(request: &UploadRequest, message: String, elapsed: Duration) -> UploadError {
    let message = request
        .headers
        .iter()
        .filter(|h| h.sensitive)
        .fold(message, |msg, h| scrub_secret(&msg, &h.value));
    UploadError::Transport(TransportCause::Network { message, elapsed })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: UploadRequest) -> Result<UploadResult, UploadError> {
        let file = File::open(&request.body.path).await.map_err(|e| {
            network_failure(
                &request,
                format!("failed to open {} for streaming: {}", request.body.path.display(), e),
                Duration::ZERO,
            )
        })?;

        let body = Body::wrap_stream(ReaderStream::with_capacity(file, self.chunk_size));
        let mut builder = self
            .client
            .request(request.method.clone(), request.destination.as_str())
            .header(CONTENT_LENGTH, request.body.length);
        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }

        info!("Uploading {} bytes to {}", request.body.length, request.destination);
        let start = Instant::now();

        let response = builder.body(body).send().await.map_err(|e| {
            network_failure(
                &request,
                format!("{}: {}", classify_reqwest_error(&e), describe_error(&e)),
                start.elapsed(),
            )
        })?;

        let status = response.status().as_u16();
        let server_sha256 = response
            .headers()
            .get(&self.server_checksum_header)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let body = response.text().await.map_err(|e| {
            network_failure(
                &request,
                format!("{}: {}", classify_reqwest_error(&e), describe_error(&e)),
                start.elapsed(),
            )
        })?;
        let elapsed = start.elapsed();

        debug!(
            "Server answered HTTP {} in {:?} (server checksum: {})",
            status,
            elapsed,
            server_sha256.as_deref().unwrap_or("none")
        );

        Ok(UploadResult {
            status,
            elapsed,
            server_sha256,
            body,
        })
    }
}
