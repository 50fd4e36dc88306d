//! Benchmarks for markdown parsing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use hangeuldown::document::{Document, WELCOME_MARKDOWN};
use hangeuldown::theme::Theme;

fn bench_parse_simple(c: &mut Criterion) {
    let md = "# 안녕하세요\n\n한글 문서";
    c.bench_function("parse_simple", |b| {
        b.iter(|| Document::parse(black_box(md)).unwrap())
    });
}

fn bench_parse_welcome(c: &mut Criterion) {
    c.bench_function("parse_welcome", |b| {
        b.iter(|| Document::parse_with_layout(black_box(WELCOME_MARKDOWN), 60).unwrap())
    });
}

fn bench_parse_long_document(c: &mut Criterion) {
    let md = WELCOME_MARKDOWN.repeat(20);
    c.bench_function("parse_long_document", |b| {
        b.iter(|| Document::parse_with_layout(black_box(&md), 48).unwrap())
    });
}

fn bench_highlight_visible_range(c: &mut Criterion) {
    c.bench_function("highlight_visible_range", |b| {
        b.iter_batched(
            || Document::parse_with_layout(WELCOME_MARKDOWN, 60).unwrap(),
            |mut doc| doc.ensure_highlight_for_range(0..80, Theme::Dark),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_parse_simple,
    bench_parse_welcome,
    bench_parse_long_document,
    bench_highlight_visible_range
);
criterion_main!(benches);
