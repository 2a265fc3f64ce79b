//! Pipeline benchmarks: index build, whitelist resolution, cached and uncached suggestions.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hangul_autocomplete::inference::resolve;
use hangul_autocomplete::{
    Autocompleter, DemoScorer, HfTokenizer, OutputMode, SubwordTokenizer, VocabEntry,
    VocabularyIndex,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Synthetic vocabulary of `size` two-syllable Hangul tokens.
fn synthetic_vocabulary(size: usize) -> Vec<VocabEntry> {
    (0..size)
        .map(|i| {
            let first = char::from_u32(0xAC00 + (i as u32 * 7) % 11_172).unwrap_or('가');
            let second = char::from_u32(0xAC00 + (i as u32 * 13) % 11_172).unwrap_or('가');
            let text = if i % 2 == 0 {
                format!("▁{}{}", first, second)
            } else {
                format!("{}{}", first, second)
            };
            VocabEntry::new(text, i as u32)
        })
        .collect()
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");
    for size in [1_000, 10_000, 50_000] {
        let vocab = synthetic_vocabulary(size);
        group.bench_with_input(BenchmarkId::new("build", size), &vocab, |b, vocab| {
            b.iter(|| VocabularyIndex::build(vocab.iter().cloned()).unwrap());
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let index = VocabularyIndex::build(synthetic_vocabulary(50_000)).unwrap();
    let exclude = HashSet::new();
    for fragment in ["ㄱ", "ㅁ", "가", "강"] {
        group.bench_with_input(BenchmarkId::new("fragment", fragment), &fragment, |b, f| {
            b.iter(|| resolve(f, &index, &exclude));
        });
    }
    group.finish();
}

fn bench_suggest(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggest");
    let tokenizer = Arc::new(HfTokenizer::demo().unwrap());
    let scorer = Arc::new(DemoScorer::seeded(tokenizer.vocab_size(), 64, 42));
    let engine = Autocompleter::new(tokenizer, scorer).unwrap();

    for query in ["ㅁ", "강남역 맛", "서울 여"] {
        group.bench_with_input(BenchmarkId::new("uncached", query), &query, |b, q| {
            b.iter(|| engine.suggest_uncached(q, 5, OutputMode::Full).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("cached", query), &query, |b, q| {
            b.iter(|| engine.suggest(q, 5, OutputMode::Full).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_index_build, bench_resolve, bench_suggest);
criterion_main!(benches);
