//! Benchmarks for the README to page pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use rstpage::dom::{Html5everParser, HtmlParser};
use rstpage::page::render_page;
use rstpage::{MarkupRenderer, RenderConfig, RstRenderer, flatten_sections, transform_document};

const README: &str = include_str!("../tests/fixtures/README.rst");

// ============================================================================
// Stage Benchmarks
// ============================================================================

fn bench_render_rst(c: &mut Criterion) {
    let config = RenderConfig::default();

    c.bench_function("render_rst", |b| {
        b.iter(|| RstRenderer.render(README, &config).unwrap());
    });
}

fn bench_parse_and_flatten(c: &mut Criterion) {
    let doc = RstRenderer.render(README, &RenderConfig::default()).unwrap();

    c.bench_function("parse_and_flatten", |b| {
        b.iter(|| {
            let mut dom = Html5everParser.parse(&doc.body).unwrap();
            let body = dom.find_by_tag("body").unwrap();
            flatten_sections(&mut dom, body)
        });
    });
}

// ============================================================================
// Pipeline Benchmarks
// ============================================================================

fn bench_transform_document(c: &mut Criterion) {
    c.bench_function("transform_document", |b| {
        b.iter(|| transform_document(README).unwrap());
    });
}

fn bench_render_page(c: &mut Criterion) {
    let content = transform_document(README).unwrap();

    c.bench_function("render_page", |b| {
        b.iter(|| render_page(&content));
    });
}

criterion_group!(
    benches,
    // Stages
    bench_render_rst,
    bench_parse_and_flatten,
    // Pipeline
    bench_transform_document,
    bench_render_page,
);
criterion_main!(benches);
