// crates/rigplot-core/src/error.rs

use rigplot_parser::LoaderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Loading failed: {0}")]
    Loader(#[from] LoaderError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("line '{label}' has {found} samples but the time axis has {expected}")]
    Misaligned {
        label: String,
        found: usize,
        expected: usize,
    },

    #[error("{renderer} drawing failed: {message}")]
    Drawing {
        renderer: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
