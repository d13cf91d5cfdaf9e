use cfgperf_terminal::scores::{RawScoreFrame, ScoreRecord, ScoreValue};
use cfgperf_terminal::series::{
    Brush, OverlaySeries, StyleAssignment, StylePolicy, build_rows, format_x, hover_label,
    parse_x_label, segments, style_at,
};

fn keys(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|k| k.to_string()).collect()
}

fn frame() -> RawScoreFrame {
    RawScoreFrame::new()
        .with(
            "10",
            ScoreRecord::new()
                .with("a", ScoreValue::Fraction(0.5))
                .with("b", ScoreValue::Fraction(0.9)),
        )
        .with("2", ScoreRecord::new().with("a", ScoreValue::Fraction(0.1)))
        .with("warmup", ScoreRecord::new().with("a", ScoreValue::Fraction(0.3)))
        .with(
            " 30 ",
            ScoreRecord::new()
                .with("a", ScoreValue::Invalid)
                .with("b", ScoreValue::Fraction(0.4)),
        )
}

#[test]
fn rows_sort_numerically_and_fill_gaps() {
    let table = build_rows(&frame(), &keys(&["a", "b"]));
    assert_eq!(table.xs(), vec![2.0, 10.0, 30.0]);
    assert_eq!(table.column("a"), Some(vec![Some(0.1), Some(0.5), None]));
    assert_eq!(table.column("b"), Some(vec![None, Some(0.9), Some(0.4)]));
    assert_eq!(table.value(1, "b"), Some(0.9));
    assert_eq!(table.value(0, "missing"), None);
}

#[test]
fn x_labels_must_be_finite_numbers() {
    assert_eq!(parse_x_label(" 12.5 "), Some(12.5));
    assert_eq!(parse_x_label("1e3"), Some(1000.0));
    assert_eq!(parse_x_label("step-3"), None);
    assert_eq!(parse_x_label("NaN"), None);
    assert_eq!(parse_x_label("inf"), None);
    assert_eq!(parse_x_label(""), None);
}

#[test]
fn duplicate_x_keeps_source_order() {
    let frame = RawScoreFrame::new()
        .with("5", ScoreRecord::new().with("a", ScoreValue::Fraction(0.1)))
        .with("5.0", ScoreRecord::new().with("a", ScoreValue::Fraction(0.2)));
    let table = build_rows(&frame, &keys(&["a"]));
    assert_eq!(table.column("a"), Some(vec![Some(0.1), Some(0.2)]));
}

#[test]
fn projection_matches_direct_build() {
    let all = keys(&["a", "b"]);
    let full = build_rows(&frame(), &all);
    for subset in [keys(&["a"]), keys(&["b"]), keys(&["b", "a"]), Vec::new()] {
        assert_eq!(full.project(&subset), build_rows(&frame(), &subset));
    }
}

#[test]
fn projection_skips_unknown_keys() {
    let full = build_rows(&frame(), &keys(&["a"]));
    let projected = full.project(&keys(&["nope", "a"]));
    assert_eq!(projected.keys, keys(&["a"]));
    assert_eq!(projected.rows.len(), 3);
}

#[test]
fn x_domain_is_padded_and_independent_of_keys() {
    let with_keys = build_rows(&frame(), &keys(&["a", "b"]));
    let without_keys = build_rows(&frame(), &[]);
    let domain = with_keys.x_domain(0.02).expect("domain");
    assert!((domain[0] - (2.0 - 0.56)).abs() < 1e-9);
    assert!((domain[1] - (30.0 + 0.56)).abs() < 1e-9);
    assert_eq!(without_keys.x_domain(0.02), Some(domain));
}

#[test]
fn single_x_domain_is_widened() {
    let frame = RawScoreFrame::new().with("4", ScoreRecord::new());
    let table = build_rows(&frame, &[]);
    assert_eq!(table.x_domain(0.02), Some([3.0, 5.0]));
    assert_eq!(build_rows(&RawScoreFrame::new(), &[]).x_domain(0.02), None);
}

#[test]
fn gaps_split_segments() {
    let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
    let column = [Some(0.1), None, Some(0.3), Some(0.4), None];
    assert_eq!(
        segments(&xs, &column),
        vec![vec![(1.0, 0.1)], vec![(3.0, 0.3), (4.0, 0.4)]]
    );
    assert!(segments(&xs, &[None, None, None, None, None]).is_empty());
}

#[test]
fn stable_styles_survive_toggles() {
    let all = keys(&["a", "b", "c"]);
    let everything = StyleAssignment::new(StylePolicy::Stable, &all, &all);
    let only_c = StyleAssignment::new(StylePolicy::Stable, &all, &keys(&["c"]));
    assert_eq!(everything.style_for("c"), only_c.style_for("c"));
    assert_eq!(only_c.style_for("c"), style_at(2));
}

#[test]
fn positional_styles_follow_visible_order() {
    let all = keys(&["a", "b", "c"]);
    let only_c = StyleAssignment::new(StylePolicy::Positional, &all, &keys(&["c"]));
    assert_eq!(only_c.style_for("c"), style_at(0));
    assert_eq!(only_c.style_for("b"), style_at(1));
}

#[test]
fn palette_cycles_independently() {
    let first = style_at(0);
    let eleventh = style_at(11);
    assert_eq!(first.color, eleventh.color);
    assert_ne!(first.dash, eleventh.dash);
    assert_eq!(style_at(6).dash, first.dash);
    assert_eq!(style_at(5).width, first.width);
}

#[test]
fn overlay_is_seeded_and_bounded() {
    let xs: Vec<f64> = (0..40).map(|i| i as f64 * 25.0).collect();
    let a = OverlaySeries::synthetic_performance(&xs, 7);
    let b = OverlaySeries::synthetic_performance(&xs, 7);
    assert_eq!(a, b);
    assert_eq!(a.points.len(), xs.len());
    assert_eq!(a.range, [0.0, 100.0]);
    assert!(a.points.iter().all(|(_, y)| (0.0..=100.0).contains(y)));
    assert!((a.rescale(50.0, [0.0, 1.0]) - 0.5).abs() < 1e-9);
}

#[test]
fn brush_moves_within_rows() {
    let full = Brush::full(10).expect("rows");
    assert!(full.is_full(10));
    let narrowed = full.narrow();
    assert_eq!(narrowed, Brush { start: 1, end: 8 });
    assert_eq!(narrowed.pan(5, 10), Brush { start: 2, end: 9 });
    assert_eq!(narrowed.pan(-5, 10), Brush { start: 0, end: 7 });
    assert_eq!(narrowed.widen(10), full);

    let tight = Brush { start: 4, end: 5 };
    assert_eq!(tight.narrow(), tight);
    assert_eq!(Brush { start: 3, end: 9 }.clamp(5), Some(Brush { start: 3, end: 4 }));
    assert_eq!(Brush::full(0), None);
}

#[test]
fn hover_label_formats_point() {
    assert_eq!(hover_label("semantic_score", 200.0, 0.12345), "Semantic Score\nX: 200\nY: 0.123");
    assert_eq!(format_x(2.5), "2.50");
}
