use rigplot_parser::{FilterMode, LoadReport, LoadedSeries};
use serde::Serialize;

use crate::error::Result;
use crate::presets::PlotPreset;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub name: String,
    pub label: String,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl SeriesSummary {
    fn from_values(name: &str, label: &str, values: &[f64]) -> Self {
        let count = values.len();
        let (min, max, mean) = if values.is_empty() {
            (None, None, None)
        } else {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = values.iter().sum::<f64>() / count as f64;
            (Some(min), Some(max), Some(mean))
        };

        Self {
            name: name.to_string(),
            label: label.to_string(),
            count,
            min,
            max,
            mean,
        }
    }
}

/// What `inspect --json` reports for one loaded recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingSummary {
    pub preset: String,
    pub title: String,
    pub mode: FilterMode,
    pub report: LoadReport,
    pub channels: Vec<SeriesSummary>,
}

impl RecordingSummary {
    pub fn new(preset: &PlotPreset, dataset: &LoadedSeries, report: LoadReport) -> Self {
        Self {
            preset: preset.code.to_string(),
            title: preset.resolve_title(dataset),
            mode: preset.mode,
            report,
            channels: summarize(preset, dataset),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn summarize(preset: &PlotPreset, dataset: &LoadedSeries) -> Vec<SeriesSummary> {
    preset
        .channels
        .iter()
        .enumerate()
        .map(|(idx, channel)| {
            let values = dataset.series(idx).unwrap_or_default();
            SeriesSummary::from_values(channel.name, channel.label, values)
        })
        .collect()
}
