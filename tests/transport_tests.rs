//! Integration tests for the HTTP transport and response validation.
//!
//! A wiremock server stands in for the artifact repository. Requests are
//! assembled against an `https://` destination and then pointed at the
//! plain-HTTP mock before sending.

use std::fs;
use std::time::Duration;

use anyhow::Result;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use checksum_uploader::cloud::{evaluate, HttpTransport, RequestAssembler, Transport};
use checksum_uploader::config::UploadConfig;
use checksum_uploader::error::UploadError;
use checksum_uploader::models::{
    DigestSet, SourceArtifact, TransportCause, UploadOutcome, UploadRequest,
};
use checksum_uploader::utils::hash::compute_all;

const API_KEY: &str = "AKCp5-integration-key";
const DESTINATION: &str = "https://repo.example.com/libs-release/app.bin";

/// Answers 201 and reports back whatever SHA-256 the client sent.
struct EchoChecksum;

impl Respond for EchoChecksum {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut response = ResponseTemplate::new(201).set_body_string(r#"{"created":true}"#);
        if let Some(value) = request
            .headers
            .get("x-checksum-sha256")
            .and_then(|v| v.to_str().ok())
        {
            response = response.insert_header("X-Checksum-Sha256", value);
        }
        response
    }
}

struct Fixture {
    _dir: TempDir,
    content: Vec<u8>,
    digests: DigestSet,
    request: UploadRequest,
}

/// Write `content` to disk, hash it and assemble a request aimed at `server`.
fn fixture(content: &[u8], server: &MockServer) -> Result<Fixture> {
    let dir = TempDir::new()?;
    let file_path = dir.path().join("app.bin");
    fs::write(&file_path, content)?;

    let artifact = SourceArtifact::resolve(&file_path)?;
    let digests = compute_all(&artifact)?;
    let mut request = RequestAssembler::default().build(DESTINATION, &digests, API_KEY, &artifact)?;
    request.destination = format!("{}/libs-release/app.bin", server.uri());

    Ok(Fixture {
        _dir: dir,
        content: content.to_vec(),
        digests,
        request,
    })
}

fn transport() -> HttpTransport {
    HttpTransport::new(&UploadConfig::default()).unwrap()
}

#[tokio::test]
async fn test_echoed_checksum_is_success() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/libs-release/app.bin"))
        .respond_with(EchoChecksum)
        .expect(1)
        .mount(&server)
        .await;

    let fixture = fixture(b"0123456789", &server)?;
    let result = transport().send(fixture.request).await?;

    assert_eq!(result.status, 201);
    assert_eq!(result.server_sha256.as_deref(), Some(fixture.digests.sha256.as_str()));
    assert!(result.elapsed >= Duration::ZERO);

    match evaluate(result, &fixture.digests) {
        UploadOutcome::Success { result } => assert_eq!(result.body, r#"{"created":true}"#),
        other => panic!("unexpected outcome: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_request_carries_headers_and_exact_body() -> Result<()> {
    let server = MockServer::start().await;
    let content: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let fixture = fixture(&content, &server)?;

    Mock::given(method("PUT"))
        .and(header("X-Checksum-Md5", fixture.digests.md5.as_str()))
        .and(header("X-Checksum-Sha1", fixture.digests.sha1.as_str()))
        .and(header("X-Checksum-Sha256", fixture.digests.sha256.as_str()))
        .and(header("X-JFrog-Art-Api", API_KEY))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let result = transport().send(fixture.request).await?;
    assert_eq!(result.status, 201);
    assert_eq!(result.server_sha256, None);

    let received = server.received_requests().await.unwrap_or_default();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].body, fixture.content);
    assert_eq!(
        received[0]
            .headers
            .get("content-length")
            .and_then(|v| v.to_str().ok()),
        Some(content.len().to_string().as_str())
    );
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_transport_failure() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("repository unavailable"))
        .mount(&server)
        .await;

    let fixture = fixture(b"payload", &server)?;
    let result = transport().send(fixture.request).await?;

    match evaluate(result, &fixture.digests) {
        UploadOutcome::TransportFailure {
            cause: TransportCause::Status { status, body, .. },
        } => {
            assert_eq!(status, 500);
            assert_eq!(body, "repository unavailable");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_ok_instead_of_created_is_transport_failure() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let fixture = fixture(b"payload", &server)?;
    let result = transport().send(fixture.request).await?;
    let outcome = evaluate(result, &fixture.digests);

    assert!(!outcome.is_success());
    assert_eq!(outcome.kind(), "transport_failure");
    Ok(())
}

#[tokio::test]
async fn test_mismatched_server_checksum_is_integrity_failure() -> Result<()> {
    let server = MockServer::start().await;
    let bogus = "0".repeat(64);
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201).insert_header("X-Checksum-Sha256", bogus.as_str()))
        .mount(&server)
        .await;

    let fixture = fixture(b"0123456789", &server)?;
    let result = transport().send(fixture.request).await?;

    match evaluate(result, &fixture.digests) {
        UploadOutcome::IntegrityMismatch { expected, observed } => {
            assert_eq!(expected, fixture.digests.sha256);
            assert_eq!(observed, bogus);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_uppercase_server_checksum_matches() -> Result<()> {
    let server = MockServer::start().await;
    let fixture = fixture(b"0123456789", &server)?;
    let upper = fixture.digests.sha256.to_uppercase();
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201).insert_header("X-Checksum-Sha256", upper.as_str()))
        .mount(&server)
        .await;

    let result = transport().send(fixture.request).await?;
    assert!(evaluate(result, &fixture.digests).is_success());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_is_network_failure() -> Result<()> {
    let server = MockServer::start().await;
    let fixture = fixture(b"payload", &server)?;
    let mut request = fixture.request;
    request.destination = "http://127.0.0.1:1/libs-release/app.bin".to_string();

    match transport().send(request).await {
        Err(UploadError::Transport(TransportCause::Network { message, .. })) => {
            assert!(!message.contains(API_KEY));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}
