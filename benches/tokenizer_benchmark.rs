//! Tokenizer benchmark: measure word-boundary token scanning.

use cadence::tokenize;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Build a sample of `words` whitespace-separated words with mixed
/// separators.
fn build_sample(words: usize) -> String {
    let vocabulary = [
        "the", "scheduler", "smooths", "bursty", "arrivals", "into", "paced",
        "releases", "wörd", "你好",
    ];
    let mut text = String::new();
    for index in 0..words {
        text.push_str(vocabulary[index % vocabulary.len()]);
        text.push_str(match index % 5 {
            0 => "  ",
            1 => "\n",
            _ => " ",
        });
    }
    text
}

fn tokenize_short(c: &mut Criterion) {
    let text = build_sample(16);
    c.bench_function("tokenize_16_words", |b| {
        b.iter(|| tokenize(black_box(&text)).count())
    });
}

fn tokenize_long(c: &mut Criterion) {
    let text = build_sample(4096);
    c.bench_function("tokenize_4096_words", |b| {
        b.iter(|| tokenize(black_box(&text)).count())
    });
}

fn tokenize_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize_by_size");

    for words in [64, 256, 1024, 4096] {
        let text = build_sample(words);
        group.bench_with_input(BenchmarkId::from_parameter(words), &text, |b, text| {
            b.iter(|| tokenize(black_box(text)).count())
        });
    }

    group.finish();
}

criterion_group!(benches, tokenize_short, tokenize_long, tokenize_by_size);
criterion_main!(benches);
