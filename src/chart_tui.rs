use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget};

use crate::chart::{ChartSpec, LegendTarget};
use crate::series::{DashPattern, OVERLAY_COLOR, Rgb, format_x};

const RIGHT_AXIS_WIDTH: u16 = 6;
const MAX_LEGEND_LINES: u16 = 4;
const LEGEND_GAP: u16 = 2;

pub fn tui_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Terminal cells have no dash support; the dash pattern picks the canvas
/// marker instead so neighbouring series still read differently.
pub fn dash_marker(dash: DashPattern) -> Marker {
    match dash {
        DashPattern::Solid | DashPattern::LongDash => Marker::Braille,
        DashPattern::Dash | DashPattern::DashDot => Marker::HalfBlock,
        DashPattern::Dot | DashPattern::LongDashDot => Marker::Dot,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendSlot {
    pub target: LegendTarget,
    pub rect: Rect,
    pub text: String,
    pub visible: bool,
}

/// Geometry shared by rendering and mouse hit testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreChartLayout {
    pub plot: Rect,
    pub right_axis: Option<Rect>,
    pub readout: Rect,
    pub legend: Rect,
    pub slots: Vec<LegendSlot>,
}

type LegendEntry = (LegendTarget, String, bool);

fn legend_entries(spec: &ChartSpec) -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = spec
        .legend
        .iter()
        .map(|item| {
            (
                LegendTarget::Series(item.key.clone()),
                format!("■ {}", item.label),
                item.visible,
            )
        })
        .collect();
    if let Some((name, shown)) = &spec.overlay_legend {
        entries.push((LegendTarget::Overlay, format!("◆ {name}"), *shown));
    }
    entries
}

/// Flows `entries[start..]` left to right, wrapping at `width`, until
/// `max_lines` are full. Positions are relative to the legend area.
fn flow_from(
    entries: &[LegendEntry],
    start: usize,
    width: u16,
    max_lines: u16,
) -> Vec<(u16, u16, u16)> {
    let mut placed = Vec::new();
    let mut x = 0u16;
    let mut line = 0u16;
    for (_, text, _) in &entries[start..] {
        let w = (text.chars().count() as u16).min(width);
        if x > 0 && x + w > width {
            x = 0;
            line += 1;
        }
        if line >= max_lines {
            break;
        }
        placed.push((x, line, w));
        x = x.saturating_add(w + LEGEND_GAP);
    }
    placed
}

/// Where the overflow marker goes after the last placed entry, if it fits.
fn marker_position(
    last: Option<&(u16, u16, u16)>,
    marker_w: u16,
    width: u16,
    max_lines: u16,
) -> Option<(u16, u16)> {
    let Some(&(x, line, w)) = last else {
        return (marker_w <= width && max_lines > 0).then_some((0, 0));
    };
    let next_x = x.saturating_add(w + LEGEND_GAP);
    if next_x.saturating_add(marker_w) <= width {
        Some((next_x, line))
    } else if line + 1 < max_lines && marker_w <= width {
        Some((0, line + 1))
    } else {
        None
    }
}

struct LegendPage {
    start: usize,
    placed: Vec<(u16, u16, u16)>,
    marker: Option<(String, u16, u16)>,
}

/// One page of the legend. When the entries overflow, the page ends with a
/// marker slot that pages forward, or back to the first page on the last one.
fn paginate_from(
    entries: &[LegendEntry],
    start: usize,
    width: u16,
    max_lines: u16,
) -> LegendPage {
    let mut placed = flow_from(entries, start, width, max_lines);
    if start == 0 && placed.len() == entries.len() {
        return LegendPage {
            start,
            placed,
            marker: None,
        };
    }
    loop {
        let remaining = entries.len() - start - placed.len();
        let text = if remaining == 0 {
            "« back".to_string()
        } else {
            format!("+{remaining} more")
        };
        let marker_w = text.chars().count() as u16;
        if let Some((x, line)) = marker_position(placed.last(), marker_w, width, max_lines) {
            return LegendPage {
                start,
                placed,
                marker: Some((text, x, line)),
            };
        }
        if placed.len() <= 1 {
            return LegendPage {
                start,
                placed,
                marker: None,
            };
        }
        placed.pop();
    }
}

fn legend_pages(entries: &[LegendEntry], width: u16, max_lines: u16) -> Vec<LegendPage> {
    let mut pages = Vec::new();
    if width == 0 || max_lines == 0 || entries.is_empty() {
        return pages;
    }
    let mut start = 0;
    while start < entries.len() {
        let page = paginate_from(entries, start, width, max_lines);
        if page.placed.is_empty() {
            break;
        }
        start += page.placed.len();
        pages.push(page);
    }
    pages
}

fn page_slots(
    entries: Vec<LegendEntry>,
    area: Rect,
    max_lines: u16,
    page: usize,
) -> Vec<LegendSlot> {
    let mut pages = legend_pages(&entries, area.width, max_lines);
    if pages.is_empty() {
        return Vec::new();
    }
    let index = page % pages.len();
    let page = pages.swap_remove(index);
    let rect = |x: u16, line: u16, width: u16| Rect {
        x: area.x + x,
        y: area.y + line,
        width,
        height: 1,
    };
    let mut slots: Vec<LegendSlot> = entries
        .into_iter()
        .skip(page.start)
        .zip(page.placed)
        .map(|((target, text, visible), (x, line, width))| LegendSlot {
            target,
            rect: rect(x, line, width),
            text,
            visible,
        })
        .collect();
    if let Some((text, x, line)) = page.marker {
        let width = text.chars().count() as u16;
        slots.push(LegendSlot {
            target: LegendTarget::NextPage,
            rect: rect(x, line, width),
            text,
            visible: true,
        });
    }
    slots
}

fn legend_lines_needed(spec: &ChartSpec, width: u16) -> u16 {
    let entries = legend_entries(spec);
    legend_pages(&entries, width, MAX_LEGEND_LINES)
        .first()
        .map(|page| {
            let entry_lines = page.placed.iter().map(|p| p.1 + 1).max().unwrap_or(0);
            let marker_line = page.marker.as_ref().map(|m| m.2 + 1).unwrap_or(0);
            entry_lines.max(marker_line)
        })
        .unwrap_or(0)
}

impl ScoreChartLayout {
    pub fn compute(spec: &ChartSpec, area: Rect) -> Self {
        Self::compute_page(spec, area, 0)
    }

    /// Like `compute`, showing legend page `page`. Pages wrap around.
    pub fn compute_page(spec: &ChartSpec, area: Rect, page: usize) -> Self {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let legend_height = legend_lines_needed(spec, inner.width);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(legend_height),
            ])
            .split(inner);

        let (plot, right_axis) = if spec.overlay.is_some() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(10), Constraint::Length(RIGHT_AXIS_WIDTH)])
                .split(rows[0]);
            (cols[0], Some(cols[1]))
        } else {
            (rows[0], None)
        };

        let slots = page_slots(legend_entries(spec), rows[2], legend_height, page);
        Self {
            plot,
            right_axis,
            readout: rows[1],
            legend: rows[2],
            slots,
        }
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<&LegendTarget> {
        legend_hit(&self.slots, column, row)
    }
}

pub fn legend_hit(slots: &[LegendSlot], column: u16, row: u16) -> Option<&LegendTarget> {
    slots
        .iter()
        .find(|s| {
            row == s.rect.y && column >= s.rect.x && column < s.rect.x + s.rect.width
        })
        .map(|s| &s.target)
}

/// Terminal rendering of a `ChartSpec`.
pub struct ScoreChartWidget<'a> {
    spec: &'a ChartSpec,
    cursor_x: Option<f64>,
    readout: Option<&'a str>,
    focused: bool,
    legend_page: usize,
}

impl<'a> ScoreChartWidget<'a> {
    pub fn new(spec: &'a ChartSpec) -> Self {
        Self {
            spec,
            cursor_x: None,
            readout: None,
            focused: false,
            legend_page: 0,
        }
    }

    pub fn cursor(mut self, x: Option<f64>, readout: Option<&'a str>) -> Self {
        self.cursor_x = x;
        self.readout = readout;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn legend_page(mut self, page: usize) -> Self {
        self.legend_page = page;
        self
    }
}

impl Widget for ScoreChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spec = self.spec;
        let layout = ScoreChartLayout::compute_page(spec, area, self.legend_page);

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        Block::default()
            .title(format!(" {} ", spec.title))
            .borders(Borders::ALL)
            .border_style(border_style)
            .render(area, buf);

        let overlay_points: Vec<(f64, f64)> = spec
            .overlay
            .as_ref()
            .map(|o| {
                o.points
                    .iter()
                    .map(|(x, y)| (*x, o.rescale(*y, spec.y_bounds)))
                    .collect()
            })
            .unwrap_or_default();
        let crosshair: Vec<(f64, f64)> = self
            .cursor_x
            .map(|x| vec![(x, spec.y_bounds[0]), (x, spec.y_bounds[1])])
            .unwrap_or_default();
        let all_points: Vec<Vec<(f64, f64)>> = spec
            .series
            .iter()
            .map(|s| s.points().copied().collect())
            .collect();

        let mut datasets: Vec<Dataset> = Vec::new();
        if !crosshair.is_empty() {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Color::DarkGray))
                    .data(&crosshair),
            );
        }
        for (series, points) in spec.series.iter().zip(all_points.iter()) {
            let color = tui_color(series.style.color);
            for segment in &series.segments {
                datasets.push(
                    Dataset::default()
                        .marker(dash_marker(series.style.dash))
                        .graph_type(GraphType::Line)
                        .style(Style::default().fg(color))
                        .data(segment),
                );
            }
            datasets.push(
                Dataset::default()
                    .marker(Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(color))
                    .data(points),
            );
        }
        if !overlay_points.is_empty() {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(tui_color(OVERLAY_COLOR)))
                    .data(&overlay_points),
            );
        }

        let [x0, x1] = spec.x_bounds;
        let x_labels = vec![
            Span::raw(format_x(x0)),
            Span::raw(format_x((x0 + x1) / 2.0)),
            Span::raw(format_x(x1)),
        ];
        let y_labels = vec![Span::raw("0.0"), Span::raw("0.5"), Span::raw("1.0")];
        let dim = Style::default().add_modifier(Modifier::DIM);

        Chart::new(datasets)
            .legend_position(None)
            .x_axis(
                Axis::default()
                    .title(Span::styled("x", dim))
                    .bounds(spec.x_bounds)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled("score", dim))
                    .bounds(spec.y_bounds)
                    .labels(y_labels),
            )
            .render(layout.plot, buf);

        if let (Some(axis_area), Some(overlay)) = (layout.right_axis, spec.overlay.as_ref()) {
            render_right_axis(axis_area, overlay.range, buf);
        }

        if let Some(text) = self.readout {
            Paragraph::new(text.to_string())
                .style(Style::default().fg(Color::Gray))
                .render(layout.readout, buf);
        }

        for slot in &layout.slots {
            let color = match &slot.target {
                LegendTarget::Series(key) => spec
                    .legend
                    .iter()
                    .find(|item| &item.key == key)
                    .map(|item| tui_color(item.style.color))
                    .unwrap_or(Color::White),
                LegendTarget::Overlay => tui_color(OVERLAY_COLOR),
                LegendTarget::NextPage => Color::Gray,
            };
            let style = if slot.visible {
                Style::default().fg(color)
            } else {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            };
            Paragraph::new(Line::from(Span::styled(slot.text.clone(), style)))
                .render(slot.rect, buf);
        }
    }
}

fn render_right_axis(area: Rect, range: [f64; 2], buf: &mut Buffer) {
    if area.height < 3 {
        return;
    }
    // The chart reserves its bottom rows for x labels and title.
    let graph_bottom = area.y + area.height.saturating_sub(3);
    let mid = area.y + (graph_bottom - area.y) / 2;
    let style = Style::default().fg(tui_color(OVERLAY_COLOR));
    let labels = [
        (area.y, range[1]),
        (mid, (range[0] + range[1]) / 2.0),
        (graph_bottom, range[0]),
    ];
    for (y, value) in labels {
        let rect = Rect {
            x: area.x,
            y,
            width: area.width,
            height: 1,
        };
        Paragraph::new(format!(" {value:.0}"))
            .style(style)
            .render(rect, buf);
    }
}
