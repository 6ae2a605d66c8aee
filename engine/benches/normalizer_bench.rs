use criterion::{criterion_group, criterion_main, Criterion};
use engine::{Document, EngineConfig, Normalizer, NormalizerConfig, SearchEngine};

const POSTING: &str = include_str!("../../data/doc01_admin_semarang.txt");

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::from_config(&NormalizerConfig::default()).unwrap();
    c.bench_function("normalize_posting", |b| b.iter(|| normalizer.normalize(POSTING)));
}

fn bench_search(c: &mut Criterion) {
    let docs: Vec<Document> = (0..200).map(|i| Document::new(format!("doc{i:03}.txt"), POSTING.repeat(i % 5 + 1))).collect();
    let engine = SearchEngine::build(docs, EngineConfig::default()).unwrap();
    c.bench_function("vsm_search_top5", |b| b.iter(|| engine.ranked("magang admin semarang excel", 5)));
    c.bench_function("boolean_search", |b| b.iter(|| engine.boolean("magang AND semarang NOT jakarta")));
}

criterion_group!(benches, bench_normalize, bench_search);
criterion_main!(benches);
