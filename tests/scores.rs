use cfgperf_terminal::sample_scores::fallback_frame;
use cfgperf_terminal::scores::{
    MetricCategory, RawScoreFrame, SchemaPolicy, ScoreRecord, ScoreValue, classify,
    classify_frame, short_label, title_case,
};

fn record(fields: &[(&str, ScoreValue)]) -> ScoreRecord {
    let mut rec = ScoreRecord::new();
    for (k, v) in fields {
        rec.insert(*k, *v);
    }
    rec
}

#[test]
fn only_unit_interval_numbers_are_fractions() {
    assert_eq!(ScoreValue::from_f64(0.0), ScoreValue::Fraction(0.0));
    assert_eq!(ScoreValue::from_f64(1.0), ScoreValue::Fraction(1.0));
    assert_eq!(ScoreValue::from_f64(1.0001), ScoreValue::Invalid);
    assert_eq!(ScoreValue::from_f64(-0.1), ScoreValue::Invalid);
    assert_eq!(ScoreValue::from_f64(f64::NAN), ScoreValue::Invalid);
    assert_eq!(
        ScoreValue::from_json(&serde_json::json!("0.5")),
        ScoreValue::Invalid
    );
    assert_eq!(
        ScoreValue::from_json(&serde_json::json!(null)),
        ScoreValue::Invalid
    );
}

#[test]
fn classify_keeps_source_order_and_splits_categories() {
    let rec = record(&[
        ("semantic_score", ScoreValue::Fraction(0.4)),
        ("talent_coding", ScoreValue::Fraction(0.7)),
        ("loss", ScoreValue::Invalid),
        ("efficiency", ScoreValue::Fraction(0.2)),
        ("Talent_Math", ScoreValue::Fraction(0.1)),
    ]);
    let c = classify(&rec);
    assert_eq!(
        c.plottable,
        vec!["semantic_score", "talent_coding", "efficiency", "Talent_Math"]
    );
    assert_eq!(c.keys_in(MetricCategory::Talent), ["talent_coding", "Talent_Math"]);
    assert_eq!(c.keys_in(MetricCategory::Score), ["semantic_score"]);
    assert_eq!(c.keys_in(MetricCategory::Other), ["efficiency"]);
}

#[test]
fn classify_is_pure() {
    let rec = record(&[
        ("a_score", ScoreValue::Fraction(0.3)),
        ("b", ScoreValue::Invalid),
    ]);
    let before = rec.clone();
    let first = classify(&rec);
    let second = classify(&rec);
    assert_eq!(first, second);
    assert_eq!(rec, before);
}

#[test]
fn talent_wins_over_score_in_category() {
    assert_eq!(MetricCategory::of("talent_score"), MetricCategory::Talent);
    assert_eq!(MetricCategory::of("SCORE_x"), MetricCategory::Score);
    assert_eq!(MetricCategory::of("growth"), MetricCategory::Other);
}

#[test]
fn category_split_does_not_depend_on_plottability() {
    let keys = ["talent_a", "b_score", "c"];
    for key in keys {
        let plottable = classify(&record(&[(key, ScoreValue::Fraction(0.5))]));
        assert_eq!(plottable.keys_in(MetricCategory::of(key)), [key]);
        let invalid = classify(&record(&[(key, ScoreValue::Invalid)]));
        assert!(invalid.is_empty());
    }
}

#[test]
fn empty_record_classifies_empty() {
    let c = classify(&ScoreRecord::new());
    assert!(c.is_empty());
    assert!(c.populated_categories().is_empty());
}

fn drifting_frame() -> RawScoreFrame {
    RawScoreFrame::new()
        .with(
            "0",
            record(&[
                ("talent_a", ScoreValue::Fraction(0.1)),
                ("late_score", ScoreValue::Invalid),
            ]),
        )
        .with(
            "1",
            record(&[
                ("talent_a", ScoreValue::Fraction(0.2)),
                ("late_score", ScoreValue::Fraction(0.6)),
                ("extra", ScoreValue::Fraction(0.3)),
            ]),
        )
}

#[test]
fn first_record_policy_samples_only_first_entry() {
    let c = classify_frame(&drifting_frame(), SchemaPolicy::FirstRecord);
    assert_eq!(c.plottable, vec!["talent_a"]);
}

#[test]
fn union_policy_sees_keys_from_any_entry() {
    let c = classify_frame(&drifting_frame(), SchemaPolicy::Union);
    assert_eq!(c.plottable, vec!["talent_a", "late_score", "extra"]);
    assert_eq!(
        c.populated_categories(),
        vec![
            MetricCategory::Talent,
            MetricCategory::Score,
            MetricCategory::Other
        ]
    );
}

#[test]
fn empty_frame_classifies_empty_under_both_policies() {
    let frame = RawScoreFrame::new();
    assert!(classify_frame(&frame, SchemaPolicy::FirstRecord).is_empty());
    assert!(classify_frame(&frame, SchemaPolicy::Union).is_empty());
}

#[test]
fn schema_policy_parses_env_values() {
    assert_eq!(SchemaPolicy::parse("first"), Some(SchemaPolicy::FirstRecord));
    assert_eq!(SchemaPolicy::parse(" UNION "), Some(SchemaPolicy::Union));
    assert_eq!(SchemaPolicy::parse("sometimes"), None);
}

#[test]
fn record_insert_replaces_in_place() {
    let mut rec = record(&[
        ("a", ScoreValue::Fraction(0.1)),
        ("b", ScoreValue::Fraction(0.2)),
    ]);
    rec.insert("a", ScoreValue::Invalid);
    let keys: Vec<&str> = rec.fields().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(rec.get("a"), Some(ScoreValue::Invalid));
    assert_eq!(rec.len(), 2);
}

#[test]
fn labels_are_title_cased() {
    assert_eq!(title_case("growth_talent_score"), "Growth Talent Score");
    assert_eq!(title_case("semantic"), "Semantic");
    assert_eq!(short_label("talent_coding"), "Coding");
    assert_eq!(short_label("semantic_score"), "Semantic");
    assert_eq!(short_label("score"), "Score");
    assert_eq!(short_label("efficiency_ratio"), "Efficiency Ratio");
}

#[test]
fn sample_frame_charts_talents_and_scores_but_not_loss() {
    let c = classify_frame(&fallback_frame(), SchemaPolicy::Union);
    assert!(c.plottable.iter().any(|k| k == "talent_math"));
    assert!(!c.plottable.iter().any(|k| k == "train_loss"));
    assert_eq!(c.keys_in(MetricCategory::Talent).len(), 4);
    assert_eq!(c.keys_in(MetricCategory::Score).len(), 3);
    assert_eq!(c.keys_in(MetricCategory::Other), ["efficiency_ratio"]);
}
