// crates/rigplot-core/src/render.rs

use std::fmt::Display;

use plotters::prelude::*;
use tracing::debug;

use crate::chart::{ChartRenderer, ChartSpec};
use crate::error::RenderError;

pub const PLOT_WIDTH: u32 = 1280;
pub const PLOT_HEIGHT: u32 = 720;

const FONT_SIZE_TITLE: i32 = 28;
const FONT_SIZE_AXIS_LABEL: i32 = 18;
const FONT_SIZE_LEGEND: i32 = 16;
const LINE_WIDTH_PLOT: u32 = 1;
const LINE_WIDTH_LEGEND: u32 = 2;

/// Draws a [`ChartSpec`] into an in-memory SVG document.
#[derive(Debug, Clone, Copy)]
pub struct SvgChartRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self {
            width: PLOT_WIDTH,
            height: PLOT_HEIGHT,
        }
    }
}

impl SvgChartRenderer {
    const NAME: &'static str = "svg";

    fn drawing_error(err: impl Display) -> RenderError {
        RenderError::Drawing {
            renderer: Self::NAME,
            message: err.to_string(),
        }
    }

    fn draw(&self, chart: &ChartSpec, document: &mut String) -> Result<(), RenderError> {
        let root = SVGBackend::with_string(document, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(Self::drawing_error)?;

        let mut context = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", FONT_SIZE_TITLE))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(chart.x_range(), chart.y_range())
            .map_err(Self::drawing_error)?;

        {
            let mut mesh = context.configure_mesh();
            mesh.x_desc(chart.x_label.as_str())
                .axis_desc_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
                .x_labels(10)
                .y_labels(10);
            if let Some(y_label) = &chart.y_label {
                mesh.y_desc(y_label.as_str());
            }
            mesh.draw().map_err(Self::drawing_error)?;
        }

        for (idx, line) in chart.lines.iter().enumerate() {
            let color = Palette99::pick(idx).to_rgba();
            context
                .draw_series(LineSeries::new(
                    chart.points(line),
                    color.stroke_width(LINE_WIDTH_PLOT),
                ))
                .map_err(Self::drawing_error)?
                .label(line.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
                });
        }

        if !chart.lines.is_empty() {
            context
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(("sans-serif", FONT_SIZE_LEGEND))
                .draw()
                .map_err(Self::drawing_error)?;
        }

        root.present().map_err(Self::drawing_error)
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn render(&self, chart: &ChartSpec) -> Result<String, RenderError> {
        chart.check_alignment()?;

        let mut document = String::new();
        self.draw(chart, &mut document)?;

        debug!(
            title = %chart.title,
            lines = chart.lines.len(),
            samples = chart.x.len(),
            bytes = document.len(),
            "chart rendered"
        );
        Ok(document)
    }
}
