use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsonseq::{FrameReader, FrameWriter};
use serde_json::{json, Value};

fn make_stream(records: usize) -> Vec<u8> {
    let mut writer = FrameWriter::default();
    let mut out = Vec::new();
    for i in 0..records {
        let value = json!({
            "id": i,
            "name": format!("record-{}", i),
            "tags": ["alpha", "beta", "gamma"],
            "nested": {"ok": i % 2 == 0, "score": i * 3},
        });
        out.extend_from_slice(&writer.encode(&value).unwrap());
    }
    out
}

fn bench_reader_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_chunk_size");
    let stream = make_stream(1000);
    group.throughput(Throughput::Bytes(stream.len() as u64));

    for chunk_size in [16usize, 256, 4096, 64 * 1024].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            chunk_size,
            |b, &size| {
                b.iter(|| {
                    let mut reader = FrameReader::<Value>::default();
                    let mut count = 0;
                    for chunk in stream.chunks(size) {
                        count += reader.process(black_box(chunk)).len();
                    }
                    assert_eq!(count, 1000);
                });
            },
        );
    }
    group.finish();
}

fn bench_large_record(c: &mut Criterion) {
    // One big record delivered in many small chunks exercises the pending buffer.
    let big: Vec<u64> = (0..100_000).collect();
    let mut writer = FrameWriter::default();
    let stream = writer.encode(&big).unwrap();

    let mut group = c.benchmark_group("reader_large_record");
    group.throughput(Throughput::Bytes(stream.len() as u64));
    group.bench_function("1k_chunks", |b| {
        b.iter(|| {
            let mut reader = FrameReader::<Vec<u64>>::default();
            let mut out = Vec::new();
            for chunk in stream.chunks(1024) {
                out.extend(reader.process(black_box(chunk)));
            }
            assert_eq!(out.len(), 1);
        });
    });
    group.finish();
}

fn bench_writer(c: &mut Criterion) {
    let value = json!({"id": 1, "name": "record", "tags": ["a", "b"], "n": {"x": 1.5}});
    c.bench_function("writer_encode", |b| {
        let mut writer = FrameWriter::default();
        b.iter(|| writer.encode(black_box(&value)).unwrap());
    });
}

criterion_group!(benches, bench_reader_chunk_sizes, bench_large_record, bench_writer);
criterion_main!(benches);
