pub mod chart;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod presets;
pub mod render;
pub mod summary;

pub use chart::{ChartLine, ChartRenderer, ChartSpec};
pub use config::RunConfig;
pub use error::{PipelineError, RenderError, Result};
pub use pipeline::{prepare_preset, run_preset, PlotOutput, PreparedPlot};
pub use presets::{all_presets, find_preset, PlotPreset};
pub use render::SvgChartRenderer;
