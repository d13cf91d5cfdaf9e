use crate::scores::title_case;
use crate::series::{
    Brush, OverlaySeries, ScoreTable, SeriesStyle, StyleAssignment, X_PAD_FRACTION, segments,
};

pub const SCORE_Y_BOUNDS: [f64; 2] = [0.0, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub key: String,
    pub label: String,
    pub style: SeriesStyle,
    /// Gap-free polylines.
    pub segments: Vec<Vec<(f64, f64)>>,
}

impl SeriesSpec {
    pub fn points(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.segments.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub key: String,
    pub label: String,
    pub style: SeriesStyle,
    pub visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ChartOptions {
    pub title: String,
    pub overlay: Option<OverlaySeries>,
    pub show_overlay: bool,
    pub brush: Option<Brush>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub series: Vec<SeriesSpec>,
    pub legend: Vec<LegendItem>,
    /// Present only while the overlay is shown.
    pub overlay: Option<OverlaySeries>,
    /// Name and visibility of the overlay, present whenever one is available.
    pub overlay_legend: Option<(String, bool)>,
}

impl ChartSpec {
    /// Returns `None` when there is nothing to chart: no rows or no
    /// plottable keys at all.
    pub fn compose(
        table: &ScoreTable,
        visible_keys: &[String],
        all_keys: &[String],
        styles: &StyleAssignment,
        options: &ChartOptions,
    ) -> Option<ChartSpec> {
        if all_keys.is_empty() {
            return None;
        }
        let full_domain = table.x_domain(X_PAD_FRACTION)?;
        let x_bounds = options
            .brush
            .and_then(|b| b.clamp(table.rows.len()))
            .filter(|b| !b.is_full(table.rows.len()))
            .and_then(|b| b.x_bounds(table))
            .unwrap_or(full_domain);

        let xs = table.xs();
        let series = visible_keys
            .iter()
            .filter_map(|key| {
                let column = table.column(key)?;
                Some(SeriesSpec {
                    key: key.clone(),
                    label: title_case(key),
                    style: styles.style_for(key),
                    segments: segments(&xs, &column),
                })
            })
            .collect();

        let legend = all_keys
            .iter()
            .map(|key| LegendItem {
                key: key.clone(),
                label: title_case(key),
                style: styles.style_for(key),
                visible: visible_keys.contains(key),
            })
            .collect();

        Some(ChartSpec {
            title: options.title.clone(),
            x_bounds,
            y_bounds: SCORE_Y_BOUNDS,
            series,
            legend,
            overlay: options.overlay.clone().filter(|_| options.show_overlay),
            overlay_legend: options
                .overlay
                .as_ref()
                .map(|o| (o.name.clone(), options.show_overlay)),
        })
    }

    pub fn series(&self, key: &str) -> Option<&SeriesSpec> {
        self.series.iter().find(|s| s.key == key)
    }
}

/// What a legend click refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LegendTarget {
    Series(String),
    Overlay,
    /// The overflow marker shown when the legend needs more than one page.
    NextPage,
}
