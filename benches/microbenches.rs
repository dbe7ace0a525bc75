//! Criterion microbenches for evalview parsing and rendering.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - Evaluation document parsing (from_evaluation_str)
//! - Span composition (compose)
//! - Markdown rendering of annotated text (render_annotated_text)
//! - Whole-page rendering (render_page)

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use evalview::html::page::render_page;
use evalview::html::text::render_annotated_text;
use evalview::html::RenderContext;
use evalview::model::document::from_evaluation_str;
use evalview::model::{Annotation, EvaluationDocument};

// Include test fixtures at compile time (no file I/O during benchmark)
const EVALUATION_FIXTURE: &str = include_str!("../tests/fixtures/sample_evaluation.json");

/// A long document with many nested and overlapping spans.
fn dense_document() -> EvaluationDocument {
    let paragraph = "The **quick** brown fox jumps over the *lazy* dog. ";
    let text = paragraph.repeat(200);
    let units = text.encode_utf16().count() as i64;

    let records = (0..400)
        .map(|idx| {
            let start = (idx * 23) % units;
            let end = (start + 5 + idx % 40).min(units);
            Annotation::label(format!("s{idx}"), start, end, "x", "Accuracy")
        })
        .collect();

    EvaluationDocument::new(text, records)
}

/// Benchmark evaluation document parsing from string.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation_parse");
    group.throughput(Throughput::Bytes(EVALUATION_FIXTURE.len() as u64));

    group.bench_function("from_evaluation_str", |b| {
        b.iter(|| {
            let doc = from_evaluation_str(black_box(EVALUATION_FIXTURE)).unwrap();
            black_box(doc)
        })
    });

    group.finish();
}

/// Benchmark span composition over a dense document.
fn bench_compose(c: &mut Criterion) {
    let doc = dense_document();
    let ctx = RenderContext::new(&doc, None);

    let mut group = c.benchmark_group("compose");
    group.throughput(Throughput::Elements(doc.records.len() as u64));

    group.bench_function("dense", |b| {
        b.iter(|| {
            let composition = black_box(&ctx).compose();
            black_box(composition.runs.len())
        })
    });

    group.finish();
}

/// Benchmark markdown rendering of composed text.
fn bench_annotated_text(c: &mut Criterion) {
    let doc = dense_document();
    let ctx = RenderContext::new(&doc, None);
    let composition = ctx.compose();

    let mut group = c.benchmark_group("annotated_text");
    group.throughput(Throughput::Bytes(doc.source_text.len() as u64));

    group.bench_function("render_annotated_text", |b| {
        b.iter(|| black_box(render_annotated_text(black_box(&composition))))
    });

    group.finish();
}

/// Benchmark whole-page rendering of the sample fixture.
fn bench_page(c: &mut Criterion) {
    let doc = from_evaluation_str(EVALUATION_FIXTURE).expect("Failed to parse evaluation fixture");
    let ctx = RenderContext::new(&doc, None);

    let mut group = c.benchmark_group("page");

    group.bench_function("render_page", |b| {
        b.iter(|| black_box(render_page(black_box(&ctx)).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_compose,
    bench_annotated_text,
    bench_page
);
criterion_main!(benches);
