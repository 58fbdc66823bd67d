use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crossbeam::thread::ScopedJoinHandle;
use log::debug;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::constants::DIGEST_BUFFER_SIZE;
use crate::error::UploadError;
use crate::models::{DigestSet, HashAlgorithm, SourceArtifact};

/// Output of a single digest worker: lowercase hex digest and bytes read.
type WorkerOutput = io::Result<(String, u64)>;

/// Hash a file with one algorithm, reading it start to end through its own
/// handle and buffer.
fn digest_file<D: Digest>(path: &Path) -> WorkerOutput {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(DIGEST_BUFFER_SIZE, file);
    let mut hasher = D::new();
    let mut buffer = vec![0u8; DIGEST_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
        total += bytes_read as u64;
    }

    Ok((hex::encode(hasher.finalize()), total))
}

fn join_worker(
    handle: ScopedJoinHandle<'_, WorkerOutput>,
    algorithm: HashAlgorithm,
) -> WorkerOutput {
    handle.join().unwrap_or_else(|_| {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{} digest worker panicked", algorithm),
        ))
    })
}

/// Calculate MD5, SHA-1 and SHA-256 of a file concurrently.
///
/// One worker per algorithm; all three are joined before this returns. If
/// any worker fails, the first failure in algorithm order is returned and no
/// digest is kept.
pub fn compute_file_digests(path: &Path) -> Result<(DigestSet, u64), UploadError> {
    run_digest_workers(
        path,
        || digest_file::<Md5>(path),
        || digest_file::<Sha1>(path),
        || digest_file::<Sha256>(path),
    )
}

/// Fan the three workers out on scoped threads and join them in algorithm
/// order. A panicking worker counts as a failed read.
fn run_digest_workers<A, B, C>(
    path: &Path,
    md5: A,
    sha1: B,
    sha256: C,
) -> Result<(DigestSet, u64), UploadError>
where
    A: FnOnce() -> WorkerOutput + Send,
    B: FnOnce() -> WorkerOutput + Send,
    C: FnOnce() -> WorkerOutput + Send,
{
    let joined = crossbeam::scope(|scope| {
        let md5 = scope.spawn(move |_| md5());
        let sha1 = scope.spawn(move |_| sha1());
        let sha256 = scope.spawn(move |_| sha256());

        [
            join_worker(md5, HashAlgorithm::Md5),
            join_worker(sha1, HashAlgorithm::Sha1),
            join_worker(sha256, HashAlgorithm::Sha256),
        ]
    })
    .map_err(|_| {
        UploadError::io(path, io::Error::new(io::ErrorKind::Other, "digest scope panicked"))
    })?;

    let mut digests = Vec::with_capacity(HashAlgorithm::ALL.len());
    let mut first_error = None;

    for (algorithm, result) in HashAlgorithm::ALL.into_iter().zip(joined) {
        match result {
            Ok(output) => digests.push(output),
            Err(e) => {
                debug!("{} worker failed for {}: {}", algorithm, path.display(), e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if let Some(e) = first_error {
        return Err(UploadError::io(path, e));
    }

    let lengths: Vec<u64> = digests.iter().map(|(_, len)| *len).collect();
    if lengths.windows(2).any(|pair| pair[0] != pair[1]) {
        return Err(UploadError::io(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file changed while hashing (bytes read per worker: {:?})", lengths),
            ),
        ));
    }

    let mut hex = digests.into_iter().map(|(digest, _)| digest);
    let (md5, sha1, sha256) = match (hex.next(), hex.next(), hex.next()) {
        (Some(md5), Some(sha1), Some(sha256)) => (md5, sha1, sha256),
        _ => {
            return Err(UploadError::io(
                path,
                io::Error::new(io::ErrorKind::Other, "digest worker produced no result"),
            ))
        }
    };

    Ok((DigestSet { md5, sha1, sha256 }, lengths[0]))
}

/// Compute the full digest set of a resolved artifact.
///
/// Besides worker failures, a file whose size no longer matches the resolved
/// length is an I/O failure: the digests would not describe the bytes the
/// transport is about to stream.
pub fn compute_all(artifact: &SourceArtifact) -> Result<DigestSet, UploadError> {
    let (digests, bytes_read) = compute_file_digests(artifact.path())?;

    if bytes_read != artifact.length() {
        return Err(UploadError::io(
            artifact.path(),
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "read {} bytes but the file was {} bytes when resolved",
                    bytes_read,
                    artifact.length()
                ),
            ),
        ));
    }

    debug!(
        "Digests for {}: md5={} sha1={} sha256={}",
        artifact.display_name(),
        digests.md5,
        digests.sha1,
        digests.sha256
    );
    Ok(digests)
}
