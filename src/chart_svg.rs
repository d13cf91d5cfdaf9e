use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::{DashedLineSeries, LineSeries};

use crate::chart::ChartSpec;
use crate::series::{DashPattern, OVERLAY_COLOR, Rgb, SeriesStyle, format_x};

pub const DEFAULT_SVG_SIZE: (u32, u32) = (1200, 600);

fn plot_color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

/// (dash length, gap) in pixels; `None` draws a solid line.
fn dash_lengths(dash: DashPattern) -> Option<(u32, u32)> {
    match dash {
        DashPattern::Solid => None,
        DashPattern::Dash => Some((8, 5)),
        DashPattern::Dot => Some((2, 4)),
        DashPattern::DashDot => Some((6, 3)),
        DashPattern::LongDash => Some((14, 6)),
        DashPattern::LongDashDot => Some((12, 4)),
    }
}

fn line_style(style: &SeriesStyle) -> ShapeStyle {
    plot_color(style.color).stroke_width(style.width.round().max(1.0) as u32)
}

pub fn render_svg(spec: &ChartSpec, size: (u32, u32)) -> Result<String> {
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, size).into_drawing_area();
        draw_chart(&root, spec)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(out)
}

pub fn write_svg(spec: &ChartSpec, path: &Path, size: (u32, u32)) -> Result<()> {
    let svg = render_svg(spec, size)?;
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).context("create svg export dir")?;
        }
    }
    fs::write(path, svg).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let [x0, x1] = spec.x_bounds;
    let [y0, y1] = spec.y_bounds;
    let overlay_range = spec
        .overlay
        .as_ref()
        .map(|o| o.range)
        .unwrap_or(spec.y_bounds);
    let right_area = if spec.overlay.is_some() { 64 } else { 0 };

    let mut chart = ChartBuilder::on(root)
        .margin(16)
        .caption(&spec.title, ("sans-serif", 20))
        .set_label_area_size(LabelAreaPosition::Left, 56)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .set_label_area_size(LabelAreaPosition::Right, right_area)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(|e| anyhow!("{:?}", e))?
        .set_secondary_coord(x0..x1, overlay_range[0]..overlay_range[1]);

    let x_fmt = |x: &f64| format_x(*x);
    chart
        .configure_mesh()
        .x_desc("X")
        .y_desc("Score Value")
        .y_labels(6)
        .x_label_formatter(&x_fmt)
        .light_line_style(RGBColor(0xf0, 0xf0, 0xf0))
        .label_style(("sans-serif", 12))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    for series in &spec.series {
        let color = plot_color(series.style.color);
        let style = line_style(&series.style);

        // Empty anchor series carries the legend entry once per metric.
        chart
            .draw_series(LineSeries::new(std::iter::empty::<(f64, f64)>(), style))
            .map_err(|e| anyhow!("{:?}", e))?
            .label(series.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        for segment in &series.segments {
            match dash_lengths(series.style.dash) {
                None => {
                    chart
                        .draw_series(LineSeries::new(segment.iter().copied(), style))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
                Some((len, gap)) => {
                    chart
                        .draw_series(DashedLineSeries::new(
                            segment.iter().copied(),
                            len,
                            gap,
                            style,
                        ))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
            }
        }

        let marker = series.style.marker_size;
        chart
            .draw_series(
                series
                    .points()
                    .map(|&(x, y)| Circle::new((x, y), marker / 2 + 1, color.filled())),
            )
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    if let Some(overlay) = &spec.overlay {
        let color = plot_color(OVERLAY_COLOR);
        let style = color.stroke_width(3);
        chart
            .configure_secondary_axes()
            .y_desc(overlay.name.as_str())
            .label_style(("sans-serif", 12))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .draw_secondary_series(DashedLineSeries::new(
                overlay.points.iter().copied(),
                14,
                6,
                style,
            ))
            .map_err(|e| anyhow!("{:?}", e))?
            .label(overlay.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart
            .draw_secondary_series(
                overlay
                    .points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
            )
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    if !spec.series.is_empty() || spec.overlay.is_some() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .label_font(("sans-serif", 12))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}
