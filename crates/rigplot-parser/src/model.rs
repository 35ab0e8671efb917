use polars::prelude::*;
use serde::Serialize;

use crate::errors::LoaderError;

/// Counters collected while reading one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Data records read after the header, blank lines excluded.
    pub rows_read: usize,
    /// Records dropped because their field count did not match.
    pub rows_skipped: usize,
    /// Rows appended to the series after filtering.
    pub rows_emitted: usize,
}

/// Index-aligned series produced by one load, one per CSV field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedSeries {
    pub title: Option<String>,
    pub series: Vec<Vec<f64>>,
}

impl LoadedSeries {
    /// Number of samples in every series.
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_count(&self) -> usize {
        self.series.len()
    }

    pub fn series(&self, index: usize) -> Option<&[f64]> {
        self.series.get(index).map(Vec::as_slice)
    }

    pub fn to_dataframe(&self, names: &[&str]) -> Result<DataFrame, LoaderError> {
        if names.len() != self.series.len() {
            return Err(LoaderError::Validation {
                message: format!(
                    "{} column names supplied for {} series",
                    names.len(),
                    self.series.len()
                ),
            });
        }

        let columns: Vec<Column> = names
            .iter()
            .zip(&self.series)
            .map(|(name, values)| Series::new((*name).into(), values.clone()).into())
            .collect();

        DataFrame::new(columns).map_err(|err| LoaderError::Validation {
            message: format!("failed to build series dataframe: {err}"),
        })
    }
}

/// Column-major accumulator that only ever grows all columns together.
pub(crate) struct SeriesBuilder {
    columns: Vec<Vec<f64>>,
}

impl SeriesBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            columns: vec![Vec::new(); width],
        }
    }

    pub fn push_row(&mut self, row: &[f64]) -> Result<(), LoaderError> {
        if row.len() != self.columns.len() {
            return Err(LoaderError::Validation {
                message: format!(
                    "filter emitted a row of {} fields, expected {}",
                    row.len(),
                    self.columns.len()
                ),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.push(*value);
        }
        Ok(())
    }

    pub fn build(self, title: Option<String>) -> LoadedSeries {
        LoadedSeries {
            title,
            series: self.columns,
        }
    }
}
