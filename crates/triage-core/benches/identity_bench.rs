//! Criterion benchmarks for the identity pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use triage_core::identity::{extract_keywords, fingerprint_of, identity_of, normalize};

const MESSAGE: &str =
    r#"invalid literal for int() with base 10: '42abc' at row 1287 (column "user_id")"#;

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize", |b| b.iter(|| normalize(black_box(MESSAGE))));
}

fn bench_fingerprint(c: &mut Criterion) {
    c.bench_function("identity_and_fingerprint", |b| {
        b.iter(|| {
            let identity = identity_of("p1", "py", "ValueError", black_box(MESSAGE));
            fingerprint_of(&identity)
        })
    });
}

fn bench_keywords(c: &mut Criterion) {
    c.bench_function("extract_keywords", |b| {
        b.iter(|| extract_keywords(black_box(MESSAGE)))
    });
}

criterion_group!(benches, bench_normalize, bench_fingerprint, bench_keywords);
criterion_main!(benches);
