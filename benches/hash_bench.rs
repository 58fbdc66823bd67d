//! Benchmarks for concurrent digest calculation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use checksum_uploader::utils::hash::compute_file_digests;
use std::fs;
use tempfile::TempDir;

/// Benchmark the three-algorithm digest pass for different file sizes
fn bench_digest_file_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest_file_sizes");
    let temp_dir = TempDir::new().unwrap();

    let sizes = vec![
        (1024, "1KB"),
        (100 * 1024, "100KB"),
        (1024 * 1024, "1MB"),
        (10 * 1024 * 1024, "10MB"),
    ];

    for (size, name) in sizes {
        let file_path = temp_dir.path().join(format!("test_{}.bin", name));
        fs::write(&file_path, vec![0u8; size]).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new("compute_file_digests", name),
            &file_path,
            |b, path| {
                b.iter(|| compute_file_digests(black_box(path)).unwrap());
            },
        );
    }

    group.finish();
}

/// Concurrent workers against hashing the same file three times in a row
fn bench_concurrent_vs_sequential(c: &mut Criterion) {
    use md5::Md5;
    use sha1::Sha1;
    use sha2::{Digest, Sha256};

    let mut group = c.benchmark_group("concurrent_vs_sequential");
    let temp_dir = TempDir::new().unwrap();

    let file_size = 8 * 1024 * 1024;
    let file_path = temp_dir.path().join("test_8mb.bin");
    fs::write(&file_path, vec![0x5au8; file_size]).unwrap();

    group.throughput(Throughput::Bytes(file_size as u64));

    group.bench_function("sequential", |b| {
        b.iter(|| {
            let data = fs::read(black_box(&file_path)).unwrap();
            let md5 = hex::encode(Md5::digest(&data));
            let sha1 = hex::encode(Sha1::digest(&data));
            let sha256 = hex::encode(Sha256::digest(&data));
            (md5, sha1, sha256)
        });
    });

    group.bench_function("concurrent", |b| {
        b.iter(|| compute_file_digests(black_box(&file_path)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_digest_file_sizes, bench_concurrent_vs_sequential);
criterion_main!(benches);
