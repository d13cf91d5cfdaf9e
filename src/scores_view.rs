use crate::chart::{ChartOptions, ChartSpec, LegendTarget};
use crate::scores::{
    Classification, MetricCategory, RawScoreFrame, SchemaPolicy, classify_frame, title_case,
};
use crate::series::{
    Brush, OverlaySeries, ScoreTable, StyleAssignment, StylePolicy, build_rows, format_x,
};
use crate::visibility::{SelectAllState, SeriesVisibilityStore};

/// One line of the key picker: a category header or a metric key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerItem {
    Category(MetricCategory),
    Key(String),
}

/// Everything the scores tab derives from a frame, plus the visibility store
/// it owns. Both chart backends are fed from `chart_spec`.
#[derive(Debug, Clone)]
pub struct ScoresView {
    schema_policy: SchemaPolicy,
    style_policy: StylePolicy,
    overlay_seed: u64,
    classification: Classification,
    table: ScoreTable,
    store: SeriesVisibilityStore,
    overlay: Option<OverlaySeries>,
    pub show_overlay: bool,
    pub brush: Option<Brush>,
    pub cursor: Option<usize>,
    pub picker_selected: usize,
    pub legend_page: usize,
}

impl ScoresView {
    pub fn new(schema_policy: SchemaPolicy, style_policy: StylePolicy, overlay_seed: u64) -> Self {
        Self {
            schema_policy,
            style_policy,
            overlay_seed,
            classification: Classification::default(),
            table: ScoreTable::default(),
            store: SeriesVisibilityStore::new(),
            overlay: None,
            show_overlay: true,
            brush: None,
            cursor: None,
            picker_selected: 0,
            legend_page: 0,
        }
    }

    /// Reclassifies a freshly loaded frame. The visibility selection and the
    /// brush survive unless the selection no longer shares any key with the
    /// new frame.
    pub fn load_frame(&mut self, frame: &RawScoreFrame) {
        self.classification = classify_frame(frame, self.schema_policy);
        self.table = build_rows(frame, &self.classification.plottable);
        let stale = self.store.is_stale(&self.classification.plottable);
        if stale {
            tracing::info!("score keys changed completely, resetting visible series");
            self.store.mark_stale();
        }
        self.store.observe_plottable(&self.classification.plottable);
        self.overlay = (!self.table.is_empty())
            .then(|| OverlaySeries::synthetic_performance(&self.table.xs(), self.overlay_seed));
        let rows = self.table.rows.len();
        if stale {
            self.legend_page = 0;
            self.brush = None;
        } else {
            self.brush = self.brush.and_then(|b| b.clamp(rows));
        }
        self.cursor = self
            .cursor
            .filter(|c| *c < self.table.rows.len());
        let picker_len = self.picker_items().len();
        self.picker_selected = self.picker_selected.min(picker_len.saturating_sub(1));
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    pub fn store(&self) -> &SeriesVisibilityStore {
        &self.store
    }

    pub fn has_content(&self) -> bool {
        !self.classification.is_empty() && !self.table.is_empty()
    }

    pub fn visible_keys(&self) -> Vec<String> {
        self.store.visible_in_order(&self.classification.plottable)
    }

    pub fn styles(&self) -> StyleAssignment {
        StyleAssignment::new(
            self.style_policy,
            &self.classification.plottable,
            &self.visible_keys(),
        )
    }

    pub fn toggle_series(&mut self, key: &str) {
        self.store.toggle(key);
    }

    pub fn toggle_category(&mut self, category: MetricCategory) {
        let keys = self.classification.keys_in(category).to_vec();
        self.store.toggle_category(&keys);
    }

    pub fn category_state(&self, category: MetricCategory) -> SelectAllState {
        self.store
            .category_state(self.classification.keys_in(category))
    }

    /// Single entry point for legend clicks from any backend.
    pub fn apply_legend(&mut self, target: &LegendTarget) {
        match target {
            LegendTarget::Series(key) => self.toggle_series(key),
            LegendTarget::Overlay => self.show_overlay = !self.show_overlay,
            LegendTarget::NextPage => self.legend_page = self.legend_page.wrapping_add(1),
        }
    }

    pub fn chart_spec(&self, title: &str) -> Option<ChartSpec> {
        if !self.has_content() {
            return None;
        }
        let options = ChartOptions {
            title: title.to_string(),
            overlay: self.overlay.clone(),
            show_overlay: self.show_overlay,
            brush: self.brush,
        };
        ChartSpec::compose(
            &self.table,
            &self.visible_keys(),
            &self.classification.plottable,
            &self.styles(),
            &options,
        )
    }

    pub fn picker_items(&self) -> Vec<PickerItem> {
        let mut items = Vec::new();
        for category in self.classification.populated_categories() {
            items.push(PickerItem::Category(category));
            for key in self.classification.keys_in(category) {
                items.push(PickerItem::Key(key.clone()));
            }
        }
        items
    }

    pub fn picker_next(&mut self) {
        let len = self.picker_items().len();
        if len > 0 {
            self.picker_selected = (self.picker_selected + 1).min(len - 1);
        }
    }

    pub fn picker_prev(&mut self) {
        self.picker_selected = self.picker_selected.saturating_sub(1);
    }

    /// Space on a key toggles it; on a category header it acts as that
    /// category's select-all control.
    pub fn activate_picker(&mut self) {
        match self.picker_items().get(self.picker_selected).cloned() {
            Some(PickerItem::Key(key)) => self.toggle_series(&key),
            Some(PickerItem::Category(category)) => self.toggle_category(category),
            None => {}
        }
    }

    /// Select-all for the category of whatever the picker points at.
    pub fn toggle_selected_category(&mut self) {
        let category = match self.picker_items().get(self.picker_selected) {
            Some(PickerItem::Category(c)) => *c,
            Some(PickerItem::Key(key)) => MetricCategory::of(key),
            None => return,
        };
        self.toggle_category(category);
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let rows = self.table.rows.len();
        if rows == 0 {
            self.cursor = None;
            return;
        }
        let current = self.cursor.unwrap_or(if delta >= 0 { 0 } else { rows - 1 }) as isize;
        let next = if self.cursor.is_none() {
            current
        } else {
            current + delta
        };
        self.cursor = Some(next.clamp(0, rows as isize - 1) as usize);
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn cursor_x(&self) -> Option<f64> {
        self.cursor
            .and_then(|c| self.table.rows.get(c))
            .map(|r| r.x)
    }

    /// Hover readout for the cursor row over the visible series.
    pub fn readout(&self) -> Option<String> {
        let row = self.cursor?;
        let x = self.table.rows.get(row)?.x;
        let mut parts = vec![format!("X: {}", format_x(x))];
        for key in self.visible_keys() {
            let value = self
                .table
                .value(row, &key)
                .map(|v| format!("{v:.3}"))
                .unwrap_or_else(|| "-".to_string());
            parts.push(format!("{}: {value}", title_case(&key)));
        }
        if self.show_overlay {
            if let Some((_, y)) = self.overlay.as_ref().and_then(|o| o.points.get(row)) {
                parts.push(format!("Performance Metric: {y:.1}"));
            }
        }
        Some(parts.join(" | "))
    }

    fn current_brush(&self) -> Option<Brush> {
        let rows = self.table.rows.len();
        self.brush
            .and_then(|b| b.clamp(rows))
            .or_else(|| Brush::full(rows))
    }

    pub fn brush_narrow(&mut self) {
        self.brush = self.current_brush().map(Brush::narrow);
    }

    pub fn brush_widen(&mut self) {
        let rows = self.table.rows.len();
        self.brush = self.current_brush().map(|b| b.widen(rows));
    }

    pub fn brush_pan(&mut self, delta: isize) {
        let rows = self.table.rows.len();
        self.brush = self.current_brush().map(|b| b.pan(delta, rows));
    }

    pub fn brush_reset(&mut self) {
        self.brush = None;
    }
}
