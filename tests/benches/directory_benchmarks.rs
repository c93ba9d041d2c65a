//! # Service Directory Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | sd-01 Chunk Store | Split and reassemble entries of growing size |
//! | sd-02 Record Directory | Full rebuild of a directory from a populated log |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sd_01_chunk_store::domain::{split, ChunkAssembler};
use sd_01_chunk_store::{ChunkStoreConfig, DataEntry};
use sd_02_record_directory::test_utils::{
    channels_record, memory_store, signer, write_raw, TestPki,
};
use sd_02_record_directory::{RecordDirectory, ServiceDirectoryApi};
use std::time::Duration;

// ============================================================================
// SD-01: Chunk codec
// ============================================================================

fn bench_split_reassemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("sd-01-chunk-store");
    let config = ChunkStoreConfig::default();

    for size in [100usize, 1_000, 10_000, 60_000] {
        let entry = DataEntry::new(1, vec![0xA5; size]);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("split_reassemble", size), &entry, |b, entry| {
            b.iter(|| {
                let chunks = split(entry, &config).unwrap();
                let entries = ChunkAssembler::new().reassemble(chunks).unwrap();
                black_box(entries)
            })
        });
    }
    group.finish();
}

// ============================================================================
// SD-02: Directory rebuild
// ============================================================================

fn bench_directory_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("sd-02-record-directory");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let pki = TestPki::new();
    let alice = pki.operator("alice", &[]);

    for length in [10usize, 50, 200] {
        let mut store = memory_store();
        let records = signer(&alice)
            .sign_chain(
                (0..length)
                    .map(|i| channels_record("alice", &i.to_string()))
                    .collect(),
                None,
            )
            .unwrap();
        for record in &records {
            write_raw(&mut store, record);
        }

        group.throughput(Throughput::Elements(length as u64));
        group.bench_with_input(BenchmarkId::new("open_and_verify", length), &store, |b, store| {
            b.iter(|| {
                let directory = RecordDirectory::new(store.attach(), pki.trust_store()).unwrap();
                black_box(directory.tip())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_split_reassemble, bench_directory_rebuild);
criterion_main!(benches);
