use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scores::{RawScoreFrame, title_case};

pub const X_PAD_FRACTION: f64 = 0.02;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub x: f64,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    pub keys: Vec<String>,
    pub rows: Vec<ChartRow>,
}

/// Parses an x label. Labels that do not parse to a finite number are
/// rejected and the whole entry is dropped from the table.
pub fn parse_x_label(label: &str) -> Option<f64> {
    let value = label.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

pub fn build_rows(frame: &RawScoreFrame, keys: &[String]) -> ScoreTable {
    let mut rows = Vec::with_capacity(frame.len());
    for (label, record) in frame.entries() {
        let Some(x) = parse_x_label(label) else {
            tracing::debug!(label = %label, "dropping score point with non-numeric x");
            continue;
        };
        let values = keys
            .iter()
            .map(|k| record.get(k).and_then(|v| v.fraction()))
            .collect();
        rows.push(ChartRow { x, values });
    }
    // Stable sort: equal x values keep source order.
    rows.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
    ScoreTable {
        keys: keys.to_vec(),
        rows,
    }
}

impl ScoreTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.x).collect()
    }

    fn key_index(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn column(&self, key: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.key_index(key)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    pub fn value(&self, row: usize, key: &str) -> Option<f64> {
        let idx = self.key_index(key)?;
        self.rows.get(row).and_then(|r| r.values[idx])
    }

    /// Restricts the table to `keys` (in that order). Keys unknown to the
    /// table are skipped. Rows are never re-derived.
    pub fn project(&self, keys: &[String]) -> ScoreTable {
        let picks: Vec<(String, usize)> = keys
            .iter()
            .filter_map(|k| self.key_index(k).map(|idx| (k.clone(), idx)))
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|r| ChartRow {
                x: r.x,
                values: picks.iter().map(|(_, idx)| r.values[*idx]).collect(),
            })
            .collect();
        ScoreTable {
            keys: picks.into_iter().map(|(k, _)| k).collect(),
            rows,
        }
    }

    pub fn x_domain(&self, pad_fraction: f64) -> Option<[f64; 2]> {
        let first = self.rows.first()?.x;
        let last = self.rows.last()?.x;
        let (min, max) = (first.min(last), first.max(last));
        if (max - min).abs() < f64::EPSILON {
            return Some([min - 1.0, max + 1.0]);
        }
        let pad = (max - min) * pad_fraction;
        Some([min - pad, max + pad])
    }
}

/// Splits a column into maximal runs of consecutive present values. A gap
/// always ends a run; segments are never joined across it.
pub fn segments(xs: &[f64], column: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for (x, value) in xs.iter().zip(column) {
        match value {
            Some(y) => current.push((*x, *y)),
            None => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

pub fn hover_label(key: &str, x: f64, y: f64) -> String {
    format!("{}\nX: {}\nY: {:.3}", title_case(key), format_x(x), y)
}

pub fn format_x(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{x:.2}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashPattern {
    Solid,
    Dash,
    Dot,
    DashDot,
    LongDash,
    LongDashDot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: Rgb,
    pub dash: DashPattern,
    pub width: f32,
    pub marker_size: u32,
}

const COLORS: [Rgb; 11] = [
    Rgb(0x1f, 0x77, 0xb4),
    Rgb(0xff, 0x7f, 0x0e),
    Rgb(0x2c, 0xa0, 0x2c),
    Rgb(0xd6, 0x27, 0x28),
    Rgb(0x94, 0x67, 0xbd),
    Rgb(0x17, 0xbe, 0xcf),
    Rgb(0xff, 0x98, 0x96),
    Rgb(0x98, 0xdf, 0x8a),
    Rgb(0xff, 0xbb, 0x78),
    Rgb(0xc5, 0xb0, 0xd5),
    Rgb(0xc4, 0x9c, 0x94),
];
const DASHES: [DashPattern; 6] = [
    DashPattern::Solid,
    DashPattern::Dash,
    DashPattern::Dot,
    DashPattern::DashDot,
    DashPattern::LongDash,
    DashPattern::LongDashDot,
];
const WIDTHS: [f32; 5] = [2.0, 2.5, 3.0, 3.5, 4.0];
const MARKER_SIZES: [u32; 5] = [4, 5, 6, 7, 8];

pub const OVERLAY_COLOR: Rgb = Rgb(0xff, 0x17, 0x44);

pub fn style_at(index: usize) -> SeriesStyle {
    SeriesStyle {
        color: COLORS[index % COLORS.len()],
        dash: DASHES[index % DASHES.len()],
        width: WIDTHS[index % WIDTHS.len()],
        marker_size: MARKER_SIZES[index % MARKER_SIZES.len()],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StylePolicy {
    /// Index into the full plottable key list; a key keeps its style no
    /// matter what else is toggled.
    #[default]
    Stable,
    Positional,
}

impl StylePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "stable" => Some(StylePolicy::Stable),
            "positional" => Some(StylePolicy::Positional),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StyleAssignment {
    policy: StylePolicy,
    all_keys: Vec<String>,
    visible_keys: Vec<String>,
}

impl StyleAssignment {
    pub fn new(policy: StylePolicy, all_keys: &[String], visible_keys: &[String]) -> Self {
        Self {
            policy,
            all_keys: all_keys.to_vec(),
            visible_keys: visible_keys.to_vec(),
        }
    }

    pub fn style_for(&self, key: &str) -> SeriesStyle {
        let pool = match self.policy {
            StylePolicy::Stable => &self.all_keys,
            StylePolicy::Positional => &self.visible_keys,
        };
        let idx = pool
            .iter()
            .position(|k| k == key)
            .or_else(|| self.all_keys.iter().position(|k| k == key))
            .unwrap_or(0);
        style_at(idx)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
    pub range: [f64; 2],
}

impl OverlaySeries {
    pub fn new(name: impl Into<String>, points: Vec<(f64, f64)>, range: [f64; 2]) -> Self {
        Self {
            name: name.into(),
            points,
            range,
        }
    }

    pub fn synthetic_performance(xs: &[f64], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = xs
            .iter()
            .map(|&x| {
                let base = 50.0 + 20.0 * (x * 0.1).sin() + 10.0 * (x * 0.05).cos();
                let noise = (rng.r#gen::<f64>() - 0.5) * 10.0;
                (x, (base + noise).clamp(0.0, 100.0))
            })
            .collect();
        Self::new("Performance Metric", points, [0.0, 100.0])
    }

    pub fn rescale(&self, y: f64, target: [f64; 2]) -> f64 {
        let span = self.range[1] - self.range[0];
        if span.abs() < f64::EPSILON {
            return target[0];
        }
        target[0] + (y - self.range[0]) / span * (target[1] - target[0])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub start: usize,
    pub end: usize,
}

impl Brush {
    pub fn full(rows: usize) -> Option<Self> {
        (rows > 0).then(|| Self {
            start: 0,
            end: rows - 1,
        })
    }

    pub fn clamp(self, rows: usize) -> Option<Self> {
        if rows == 0 {
            return None;
        }
        let end = self.end.min(rows - 1);
        let start = self.start.min(end);
        Some(Self { start, end })
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_full(&self, rows: usize) -> bool {
        self.start == 0 && rows > 0 && self.end == rows - 1
    }

    pub fn narrow(self) -> Self {
        if self.len() <= 2 {
            return self;
        }
        let mut next = self;
        next.start += 1;
        if next.len() > 2 {
            next.end -= 1;
        }
        next
    }

    pub fn widen(self, rows: usize) -> Self {
        let end = (self.end + 1).min(rows.saturating_sub(1));
        Self {
            start: self.start.saturating_sub(1),
            end,
        }
    }

    pub fn pan(self, delta: isize, rows: usize) -> Self {
        if rows == 0 {
            return self;
        }
        let len = self.len();
        let max_start = rows.saturating_sub(len);
        let start = (self.start as isize + delta).clamp(0, max_start as isize) as usize;
        Self {
            start,
            end: start + len - 1,
        }
    }

    pub fn x_bounds(&self, table: &ScoreTable) -> Option<[f64; 2]> {
        let lo = table.rows.get(self.start)?.x;
        let hi = table.rows.get(self.end)?.x;
        (hi > lo).then_some([lo, hi])
    }
}
