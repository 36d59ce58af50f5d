use criterion::{criterion_group, criterion_main, Criterion};
use txtsearch_core::tokenizer::tokenize;

fn bench_tokenize(c: &mut Criterion) {
    let text = "The quick brown fox jumps over the lazy dog near riverbank 42 times. "
        .repeat(2000);
    c.bench_function("tokenize_prose", |b| b.iter(|| tokenize(&text)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
