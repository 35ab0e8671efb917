use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("could not open '{}': {source}", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error near line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("line {line} column {column}: '{value}' is not a number")]
    NonNumericField {
        line: u64,
        column: usize,
        value: String,
    },

    #[error("invalid load configuration: {message}")]
    InvalidConfig { message: String },

    #[error("validation error: {message}")]
    Validation { message: String },
}

impl LoaderError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        LoaderError::InvalidConfig {
            message: message.into(),
        }
    }

    pub(crate) fn from_csv(source: csv::Error) -> Self {
        let line = source.position().map(|pos| pos.line()).unwrap_or(0);
        LoaderError::Csv { line, source }
    }
}
