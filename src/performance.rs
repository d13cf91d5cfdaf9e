use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget,
};

use crate::api::{EvaluationResult, PerformanceData, Run};

const PRIMARY: Color = Color::Rgb(0x25, 0x63, 0xeb);
/// Efficiency band the consistency and progress gauges are measured against.
pub const EFFICIENCY_BAND: [f64; 2] = [30.0, 45.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Area,
    Bar,
}

impl ChartKind {
    pub fn cycle(self) -> Self {
        match self {
            ChartKind::Line => ChartKind::Area,
            ChartKind::Area => ChartKind::Bar,
            ChartKind::Bar => ChartKind::Line,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Line => "LINE",
            ChartKind::Area => "AREA",
            ChartKind::Bar => "BAR",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub latest: f64,
    pub previous: f64,
    pub change: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub points: usize,
}

impl PerformanceSummary {
    pub fn from_data(data: &[PerformanceData]) -> Option<Self> {
        let last = data.last()?;
        let previous = data
            .len()
            .checked_sub(2)
            .and_then(|i| data.get(i))
            .map(|d| d.efficiency)
            .unwrap_or(0.0);
        let sum: f64 = data.iter().map(|d| d.efficiency).sum();
        let min = data.iter().map(|d| d.efficiency).fold(f64::INFINITY, f64::min);
        let max = data
            .iter()
            .map(|d| d.efficiency)
            .fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            latest: last.efficiency,
            previous,
            change: last.efficiency - previous,
            average: sum / data.len() as f64,
            min,
            max,
            points: data.len(),
        })
    }

    pub fn is_improving(&self) -> bool {
        self.latest > self.previous
    }

    /// 100% when every point lies on the same value, 0% when the spread
    /// covers the whole efficiency band.
    pub fn consistency_pct(&self) -> f64 {
        let band = EFFICIENCY_BAND[1] - EFFICIENCY_BAND[0];
        ((1.0 - (self.max - self.min) / band) * 100.0).clamp(0.0, 100.0)
    }

    /// Position of the latest value inside the efficiency band.
    pub fn latest_in_band_pct(&self) -> f64 {
        let band = EFFICIENCY_BAND[1] - EFFICIENCY_BAND[0];
        ((self.latest - EFFICIENCY_BAND[0]) / band * 100.0).clamp(0.0, 100.0)
    }

    /// Change of -5 maps to 0%, +5 to 100%.
    pub fn improvement_pct(&self) -> f64 {
        ((self.change + 5.0) / 10.0 * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub good: usize,
    pub bad: usize,
}

impl RunSummary {
    pub fn from_runs(runs: &[Run]) -> Self {
        let good = runs
            .iter()
            .filter(|r| r.evaluation_result == EvaluationResult::Good)
            .count();
        Self {
            good,
            bad: runs.len() - good,
        }
    }

    pub fn total(&self) -> usize {
        self.good + self.bad
    }

    pub fn success_rate(&self) -> Option<f64> {
        (self.total() > 0).then(|| self.good as f64 / self.total() as f64 * 100.0)
    }
}

/// Single efficiency series over time.
pub struct PerformanceTrendWidget<'a> {
    data: &'a [PerformanceData],
    kind: ChartKind,
}

impl<'a> PerformanceTrendWidget<'a> {
    pub fn new(data: &'a [PerformanceData], kind: ChartKind) -> Self {
        Self { data, kind }
    }
}

fn y_bounds(data: &[PerformanceData]) -> [f64; 2] {
    let min = data.iter().map(|d| d.efficiency).fold(f64::INFINITY, f64::min);
    let max = data
        .iter()
        .map(|d| d.efficiency)
        .fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return EFFICIENCY_BAND;
    }
    [min.min(EFFICIENCY_BAND[0]), max.max(EFFICIENCY_BAND[1])]
}

impl Widget for PerformanceTrendWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Efficiency Trend [{}] ", self.kind.label()))
            .borders(Borders::ALL);
        if self.data.is_empty() {
            Paragraph::new("No performance data")
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .render(area, buf);
            return;
        }

        if self.kind == ChartKind::Bar {
            let bars: Vec<Bar> = self
                .data
                .iter()
                .map(|d| {
                    Bar::default()
                        .value((d.efficiency * 10.0).round().max(0.0) as u64)
                        .text_value(format!("{:.1}", d.efficiency))
                        .label(Line::from(short_date(&d.date)))
                        .style(Style::default().fg(PRIMARY))
                })
                .collect();
            BarChart::default()
                .block(block)
                .data(BarGroup::default().bars(&bars))
                .bar_width(6)
                .bar_gap(1)
                .max((y_bounds(self.data)[1] * 10.0).ceil() as u64)
                .render(area, buf);
            return;
        }

        let points: Vec<(f64, f64)> = self
            .data
            .iter()
            .enumerate()
            .map(|(i, d)| (i as f64, d.efficiency))
            .collect();
        let bounds = y_bounds(self.data);
        // Area fill: one vertical stroke per point from the floor up.
        let fill: Vec<[(f64, f64); 2]> = if self.kind == ChartKind::Area {
            points.iter().map(|&(x, y)| [(x, bounds[0]), (x, y)]).collect()
        } else {
            Vec::new()
        };
        let mut datasets: Vec<Dataset> = fill
            .iter()
            .map(|stroke| {
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(PRIMARY).add_modifier(Modifier::DIM))
                    .data(stroke)
            })
            .collect();
        datasets.push(
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(PRIMARY))
                .data(&points),
        );

        let last = points.len().saturating_sub(1);
        let x_labels = vec![
            Span::raw(short_date(&self.data[0].date)),
            Span::raw(short_date(&self.data[last].date)),
        ];
        let y_labels = vec![
            Span::raw(format!("{:.0}", bounds[0])),
            Span::raw(format!("{:.0}", (bounds[0] + bounds[1]) / 2.0)),
            Span::raw(format!("{:.0}", bounds[1])),
        ];
        Chart::new(datasets)
            .block(block)
            .legend_position(None)
            .x_axis(
                Axis::default()
                    .bounds([0.0, (last as f64).max(1.0)])
                    .labels(x_labels),
            )
            .y_axis(Axis::default().bounds(bounds).labels(y_labels))
            .render(area, buf);
    }
}

/// `2024-03-18T10:00:00Z` -> `03-18`. Unparsable dates pass through.
pub fn short_date(raw: &str) -> String {
    let day = raw.trim().get(..10).unwrap_or(raw.trim());
    match chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(date) => date.format("%m-%d").to_string(),
        Err(_) => raw.trim().to_string(),
    }
}
