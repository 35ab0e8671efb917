use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::presets::PlotPreset;

/// Directory that preset default files are resolved against.
pub const DATA_DIR_ENV: &str = "RIGPLOT_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub data_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
        }
    }
}

impl RunConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let config = env::var_os(DATA_DIR_ENV)
            .map(Self::new)
            .unwrap_or_default();
        debug!(data_dir = %config.data_dir.display(), "resolved run configuration");
        config
    }

    /// An explicit input path wins; otherwise the preset's recording inside `data_dir`.
    pub fn resolve_input(&self, preset: &PlotPreset, input: Option<&Path>) -> PathBuf {
        match input {
            Some(path) => path.to_path_buf(),
            None => self.data_dir.join(preset.default_file),
        }
    }
}
