use std::path::Path;

use rigplot_parser::{load, LoadReport, LoadedSeries};
use tracing::info;

use crate::chart::{ChartRenderer, ChartSpec};
use crate::error::Result;
use crate::presets::PlotPreset;

#[derive(Debug, Clone)]
pub struct PreparedPlot {
    pub dataset: LoadedSeries,
    pub report: LoadReport,
    pub chart: ChartSpec,
}

#[derive(Debug, Clone)]
pub struct PlotOutput {
    pub prepared: PreparedPlot,
    pub document: String,
}

/// Loads `input` with the preset's layout and filter and builds its chart.
pub fn prepare_preset(preset: &PlotPreset, input: &Path) -> Result<PreparedPlot> {
    let config = preset.load_config(input);
    let (dataset, report) = load(&config)?;

    info!(
        preset = preset.code,
        path = %input.display(),
        samples = dataset.len(),
        skipped = report.rows_skipped,
        "recording prepared"
    );

    let chart = preset.chart(&dataset);
    Ok(PreparedPlot {
        dataset,
        report,
        chart,
    })
}

pub fn run_preset(
    preset: &PlotPreset,
    input: &Path,
    renderer: &dyn ChartRenderer,
) -> Result<PlotOutput> {
    let prepared = prepare_preset(preset, input)?;
    let document = renderer.render(&prepared.chart)?;

    info!(
        preset = preset.code,
        renderer = renderer.name(),
        lines = prepared.chart.lines.len(),
        "chart rendered"
    );

    Ok(PlotOutput { prepared, document })
}
