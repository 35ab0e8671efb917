use std::ops::Range;

use crate::error::RenderError;

pub const TIME_AXIS_LABEL: &str = "Time [s]";

/// Range used when a chart has no finite samples to scale against.
const EMPTY_RANGE: Range<f64> = 0.0..1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub label: String,
    pub values: Vec<f64>,
}

/// A line chart over a shared time axis, independent of any drawing backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: Option<String>,
    pub x: Vec<f64>,
    pub lines: Vec<ChartLine>,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, x: Vec<f64>) -> Self {
        Self {
            title: title.into(),
            x_label: TIME_AXIS_LABEL.to_string(),
            y_label: None,
            x,
            lines: Vec::new(),
        }
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    pub fn with_line(mut self, label: impl Into<String>, values: Vec<f64>) -> Self {
        self.lines.push(ChartLine {
            label: label.into(),
            values,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn check_alignment(&self) -> Result<(), RenderError> {
        for line in &self.lines {
            if line.values.len() != self.x.len() {
                return Err(RenderError::Misaligned {
                    label: line.label.clone(),
                    found: line.values.len(),
                    expected: self.x.len(),
                });
            }
        }
        Ok(())
    }

    pub fn x_range(&self) -> Range<f64> {
        finite_bounds(self.x.iter().copied())
            .map(|(min, max)| calculate_range(min, max))
            .unwrap_or(EMPTY_RANGE)
    }

    pub fn y_range(&self) -> Range<f64> {
        let values = self.lines.iter().flat_map(|line| line.values.iter().copied());
        finite_bounds(values)
            .map(|(min, max)| calculate_range(min, max))
            .unwrap_or(EMPTY_RANGE)
    }

    /// `(time, value)` pairs of one line that fall inside the axis ranges.
    ///
    /// Non-finite samples are skipped, as are samples left outside a range that
    /// fell back to `0..1`.
    pub fn points<'a>(&'a self, line: &'a ChartLine) -> impl Iterator<Item = (f64, f64)> + 'a {
        let (x_range, y_range) = (self.x_range(), self.y_range());
        self.x
            .iter()
            .copied()
            .zip(line.values.iter().copied())
            .filter(move |(x, y)| x_range.contains(x) && y_range.contains(y))
    }
}

/// Consumer of finished charts.
pub trait ChartRenderer {
    fn name(&self) -> &'static str;
    fn render(&self, chart: &ChartSpec) -> Result<String, RenderError>;
}

/// Pads a data range by 5%, or by a fixed amount for near-constant data.
///
/// Falls back to `0..1` when the padded range is wider than `f64` can
/// represent, since the axis tick generator cannot scale an infinite span.
pub fn calculate_range(min_val: f64, max_val: f64) -> Range<f64> {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    // Halved first so extreme finite values do not overflow the span.
    let half_span = max * 0.5 - min * 0.5;
    let padding = if half_span < 5e-7 { 0.5 } else { half_span * 0.1 };
    let (start, end) = (min - padding, max + padding);
    if (end - start).is_finite() {
        start..end
    } else {
        EMPTY_RANGE
    }
}

fn finite_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}
