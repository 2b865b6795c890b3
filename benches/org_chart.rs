use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use orgchart_rs::config::{Config, LayoutConfig};
use orgchart_rs::csv::parse_csv;
use orgchart_rs::geometry::BoxBinding;
use orgchart_rs::ids::SequentialIds;
use orgchart_rs::layout::layout;
use orgchart_rs::synthesize::synthesize;
use std::collections::HashSet;
use std::hint::black_box;

/// A complete tree with `fanout` children per node, `depth` levels deep.
fn tree_csv(fanout: usize, depth: usize) -> String {
    let mut out = String::from("id,name,parent,team\n");
    let mut level = vec!["n0".to_string()];
    out.push_str("n0,Root,,exec#c92a2a\n");
    let mut next_id = 1usize;
    for _ in 1..depth {
        let mut next_level = Vec::with_capacity(level.len() * fanout);
        for parent in &level {
            for _ in 0..fanout {
                let id = format!("n{}", next_id);
                out.push_str(&format!("{id},Person {next_id},{parent},team {}\n", next_id % 7));
                next_level.push(id);
                next_id += 1;
            }
        }
        level = next_level;
    }
    out
}

/// One root with `width` direct reports, each managed by two parents.
fn wide_csv(width: usize) -> String {
    let mut out = String::from("id,name,parent\nboss,Boss,\ndeputy,Deputy,boss\n");
    for i in 0..width {
        out.push_str(&format!("w{i},Worker {i},\"boss|deputy\"\n"));
    }
    out
}

fn shapes() -> Vec<(String, String)> {
    vec![
        ("deep_3x6".to_string(), tree_csv(3, 6)),
        ("deep_5x4".to_string(), tree_csv(5, 4)),
        ("wide_500".to_string(), wide_csv(500)),
    ]
}

fn bench_parse_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");
    for (name, text) in shapes() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, text| {
            b.iter(|| {
                let data = parse_csv(black_box(text), &mut SequentialIds::default())
                    .expect("parse failed");
                black_box(data.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    for (name, text) in shapes() {
        let data = parse_csv(&text, &mut SequentialIds::default()).expect("parse failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| {
                let laid_out = layout(black_box(data), &config);
                black_box(laid_out.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");
    let config = Config::default();
    let existing: HashSet<String> = (0..200).map(|i| format!("n{i}")).collect();
    for (name, text) in shapes() {
        let data = parse_csv(&text, &mut SequentialIds::default()).expect("parse failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| {
                let scene = synthesize(
                    black_box(data),
                    &config,
                    &existing,
                    &mut SequentialIds::new("gen-"),
                    &BoxBinding,
                );
                black_box(scene.elements.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse_csv, bench_layout, bench_synthesize);
criterion_main!(benches);
