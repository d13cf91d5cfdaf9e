use cfgperf_terminal::chart::LegendTarget;
use cfgperf_terminal::sample_scores::fallback_frame;
use cfgperf_terminal::scores::{MetricCategory, RawScoreFrame, SchemaPolicy, ScoreRecord, ScoreValue};
use cfgperf_terminal::scores_view::{PickerItem, ScoresView};
use cfgperf_terminal::series::StylePolicy;
use cfgperf_terminal::visibility::SelectAllState;

fn view() -> ScoresView {
    ScoresView::new(SchemaPolicy::Union, StylePolicy::Stable, 7)
}

fn frame(keys: &[&str]) -> RawScoreFrame {
    let mut frame = RawScoreFrame::new();
    for step in 0..4 {
        let mut record = ScoreRecord::new();
        for (i, key) in keys.iter().enumerate() {
            record.insert(*key, ScoreValue::Fraction(0.1 * (i + step) as f64 % 1.0));
        }
        frame.push((step * 10).to_string(), record);
    }
    frame
}

#[test]
fn loading_seeds_every_key_once() {
    let mut view = view();
    view.load_frame(&frame(&["talent_a", "b_score", "c"]));
    assert_eq!(view.visible_keys(), vec!["talent_a", "b_score", "c"]);

    view.toggle_series("c");
    view.load_frame(&frame(&["talent_a", "b_score", "c"]));
    assert_eq!(view.visible_keys(), vec!["talent_a", "b_score"]);
}

#[test]
fn disjoint_reload_reseeds_selection() {
    let mut view = view();
    view.load_frame(&frame(&["talent_a", "b_score"]));
    view.toggle_series("b_score");
    view.load_frame(&frame(&["x", "y"]));
    assert_eq!(view.visible_keys(), vec!["x", "y"]);
}

#[test]
fn overlapping_reload_keeps_selection() {
    let mut view = view();
    view.load_frame(&frame(&["talent_a", "b_score"]));
    view.toggle_series("b_score");
    view.load_frame(&frame(&["talent_a", "b_score", "new_score"]));
    assert_eq!(view.visible_keys(), vec!["talent_a"]);
}

#[test]
fn legend_clicks_toggle_series_and_overlay() {
    let mut view = view();
    view.load_frame(&frame(&["talent_a", "b_score"]));
    view.apply_legend(&LegendTarget::Series("talent_a".to_string()));
    assert_eq!(view.visible_keys(), vec!["b_score"]);

    assert!(view.show_overlay);
    view.apply_legend(&LegendTarget::Overlay);
    let spec = view.chart_spec("t").expect("spec");
    assert!(spec.overlay.is_none());
    assert_eq!(spec.series.len(), 1);
    assert_eq!(spec.legend.len(), 2);
}

#[test]
fn picker_lists_categories_then_keys() {
    let mut view = view();
    view.load_frame(&frame(&["b_score", "talent_a", "c"]));
    assert_eq!(
        view.picker_items(),
        vec![
            PickerItem::Category(MetricCategory::Talent),
            PickerItem::Key("talent_a".to_string()),
            PickerItem::Category(MetricCategory::Score),
            PickerItem::Key("b_score".to_string()),
            PickerItem::Category(MetricCategory::Other),
            PickerItem::Key("c".to_string()),
        ]
    );

    view.activate_picker();
    assert_eq!(view.category_state(MetricCategory::Talent), SelectAllState::Unchecked);
    view.picker_next();
    view.activate_picker();
    assert_eq!(view.category_state(MetricCategory::Talent), SelectAllState::Checked);
    view.toggle_selected_category();
    assert_eq!(view.category_state(MetricCategory::Talent), SelectAllState::Unchecked);
    assert_eq!(view.category_state(MetricCategory::Score), SelectAllState::Checked);
}

#[test]
fn cursor_readout_lists_visible_series() {
    let mut view = view();
    view.load_frame(&frame(&["talent_a", "b_score"]));
    assert!(view.readout().is_none());
    view.move_cursor(1);
    assert_eq!(view.cursor, Some(0));
    view.move_cursor(1);
    assert_eq!(view.cursor_x(), Some(10.0));
    view.toggle_series("b_score");
    let readout = view.readout().expect("readout");
    assert!(readout.starts_with("X: 10 | Talent A: "));
    assert!(!readout.contains("B Score"));
    view.move_cursor(99);
    assert_eq!(view.cursor, Some(3));
}

#[test]
fn brush_keys_zoom_and_reset() {
    let mut view = view();
    view.load_frame(&fallback_frame());
    let full = view.chart_spec("t").expect("spec").x_bounds;

    view.brush_narrow();
    view.brush_narrow();
    let zoomed = view.chart_spec("t").expect("spec").x_bounds;
    assert_eq!(zoomed, [100.0, 1050.0]);

    view.brush_pan(1);
    assert_eq!(view.chart_spec("t").expect("spec").x_bounds, [150.0, 1100.0]);

    view.brush_reset();
    assert_eq!(view.chart_spec("t").expect("spec").x_bounds, full);
}

#[test]
fn refresh_keeps_zoom_until_keys_change() {
    let mut view = view();
    view.load_frame(&fallback_frame());
    view.brush_narrow();
    view.brush_narrow();
    let zoomed = view.brush;
    assert!(zoomed.is_some());

    view.load_frame(&fallback_frame());
    assert_eq!(view.brush, zoomed);
    assert_eq!(view.chart_spec("t").expect("spec").x_bounds, [100.0, 1050.0]);

    view.load_frame(&frame(&["talent_reasoning", "b_score"]));
    assert_eq!(view.brush.map(|b| (b.start, b.end)), Some((2, 3)));

    view.load_frame(&frame(&["x", "y"]));
    assert_eq!(view.brush, None);
}

#[test]
fn empty_frame_has_no_chart() {
    let mut view = view();
    view.load_frame(&RawScoreFrame::new());
    assert!(!view.has_content());
    assert!(view.chart_spec("t").is_none());
    assert!(view.picker_items().is_empty());
}

#[test]
fn legend_overflow_marker_advances_page() {
    let mut view = view();
    view.load_frame(&frame(&["talent_a", "b_score"]));
    assert_eq!(view.legend_page, 0);
    view.apply_legend(&LegendTarget::NextPage);
    view.apply_legend(&LegendTarget::NextPage);
    assert_eq!(view.legend_page, 2);
    assert_eq!(view.visible_keys(), vec!["talent_a", "b_score"]);

    view.load_frame(&frame(&["x", "y"]));
    assert_eq!(view.legend_page, 0);
}
