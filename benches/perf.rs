use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use cfgperf_terminal::api::parse_config_json;
use cfgperf_terminal::chart::{ChartOptions, ChartSpec};
use cfgperf_terminal::chart_svg::render_svg;
use cfgperf_terminal::scores::{
    RawScoreFrame, SchemaPolicy, ScoreRecord, ScoreValue, classify_frame,
};
use cfgperf_terminal::series::{OverlaySeries, StyleAssignment, StylePolicy, build_rows};

const KEYS: &[&str] = &[
    "talent_reasoning",
    "talent_coding",
    "talent_math",
    "talent_writing",
    "semantic_score",
    "coherence_score",
    "growth_score",
    "efficiency_ratio",
    "train_loss",
];

fn large_frame(points: usize) -> RawScoreFrame {
    let mut frame = RawScoreFrame::new();
    // Reverse order so row building has to sort.
    for step in (0..points).rev() {
        let mut record = ScoreRecord::new();
        for (i, key) in KEYS.iter().enumerate() {
            if (step + i) % 7 == 0 {
                continue;
            }
            let v = ((step as f64 * 0.01) + i as f64 * 0.05).sin().abs();
            let value = if *key == "train_loss" {
                ScoreValue::Invalid
            } else {
                ScoreValue::Fraction(v)
            };
            record.insert(*key, value);
        }
        frame.push((step * 10).to_string(), record);
    }
    frame
}

fn bench_classify_union(c: &mut Criterion) {
    let frame = large_frame(2_000);
    c.bench_function("classify_union_2k", |b| {
        b.iter(|| {
            let classification = classify_frame(black_box(&frame), SchemaPolicy::Union);
            black_box(classification.plottable.len());
        })
    });
}

fn bench_build_rows(c: &mut Criterion) {
    let frame = large_frame(2_000);
    let keys = classify_frame(&frame, SchemaPolicy::Union).plottable;
    c.bench_function("build_rows_2k", |b| {
        b.iter(|| {
            let table = build_rows(black_box(&frame), black_box(&keys));
            black_box(table.rows.len());
        })
    });
}

fn bench_compose_chart(c: &mut Criterion) {
    let frame = large_frame(2_000);
    let keys = classify_frame(&frame, SchemaPolicy::Union).plottable;
    let table = build_rows(&frame, &keys);
    let visible: Vec<String> = keys.iter().step_by(2).cloned().collect();
    let styles = StyleAssignment::new(StylePolicy::Stable, &keys, &visible);
    let options = ChartOptions {
        title: "bench".to_string(),
        overlay: Some(OverlaySeries::synthetic_performance(&table.xs(), 7)),
        show_overlay: true,
        brush: None,
    };
    c.bench_function("compose_chart_2k", |b| {
        b.iter(|| {
            let spec = ChartSpec::compose(&table, &visible, &keys, &styles, &options).unwrap();
            black_box(spec.series.len());
        })
    });
}

fn bench_render_svg(c: &mut Criterion) {
    let frame = large_frame(200);
    let keys = classify_frame(&frame, SchemaPolicy::Union).plottable;
    let table = build_rows(&frame, &keys);
    let styles = StyleAssignment::new(StylePolicy::Stable, &keys, &keys);
    let spec = ChartSpec::compose(&table, &keys, &keys, &styles, &ChartOptions::default()).unwrap();
    c.bench_function("render_svg_200", |b| {
        b.iter(|| {
            let svg = render_svg(black_box(&spec), (1200, 600)).unwrap();
            black_box(svg.len());
        })
    });
}

fn bench_config_parse(c: &mut Criterion) {
    c.bench_function("config_with_scores_parse", |b| {
        b.iter(|| {
            let config = parse_config_json(black_box(CONFIG_JSON)).unwrap();
            black_box(config.scores.map(|s| s.len()));
        })
    });
}

criterion_group!(
    perf,
    bench_classify_union,
    bench_build_rows,
    bench_compose_chart,
    bench_render_svg,
    bench_config_parse
);
criterion_main!(perf);

static CONFIG_JSON: &str = include_str!("../tests/fixtures/config_with_scores.json");
