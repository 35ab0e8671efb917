mod derivative;
mod moving_average;
mod offset;
mod passthrough;

use std::fmt;

use serde::Serialize;

use crate::errors::LoaderError;

pub use derivative::DerivativeThresholdFilter;
pub use moving_average::MovingAverageFilter;
pub use offset::{CalibrationState, OffsetCalibrationFilter};
pub use passthrough::PassthroughFilter;

/// Reference angle the rig reports while the VR controller is not yet tracking.
pub const CALIBRATION_SENTINEL: f64 = 90.0;
pub const DEFAULT_REFERENCE_COLUMN: usize = 3;
pub const DEFAULT_MEASURED_COLUMN: usize = 4;
pub const DEFAULT_WINDOW: usize = 3;
pub const DEFAULT_SPEED_LIMIT: f64 = 1.0;

/// A row policy applied between parsing and accumulation.
///
/// `push` receives every row that passed the arity check, in file order, and
/// returns the row to append to the series (possibly transformed), or `None`
/// when nothing should be emitted for it.
pub trait RowFilter {
    fn name(&self) -> &'static str;
    fn push(&mut self, row: Vec<f64>) -> Option<Vec<f64>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    Passthrough,
    OffsetCalibrated {
        reference_column: usize,
        measured_column: usize,
        sentinel: f64,
    },
    MovingAverage {
        window: usize,
    },
    DerivativeThreshold {
        time_column: usize,
        value_column: usize,
        limit: f64,
    },
}

impl FilterMode {
    pub const fn offset_calibrated() -> Self {
        FilterMode::OffsetCalibrated {
            reference_column: DEFAULT_REFERENCE_COLUMN,
            measured_column: DEFAULT_MEASURED_COLUMN,
            sentinel: CALIBRATION_SENTINEL,
        }
    }

    pub const fn moving_average() -> Self {
        FilterMode::MovingAverage {
            window: DEFAULT_WINDOW,
        }
    }

    pub const fn derivative_threshold() -> Self {
        FilterMode::DerivativeThreshold {
            time_column: 0,
            value_column: 1,
            limit: DEFAULT_SPEED_LIMIT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Passthrough => "passthrough",
            FilterMode::OffsetCalibrated { .. } => "offset_calibrated",
            FilterMode::MovingAverage { .. } => "moving_average",
            FilterMode::DerivativeThreshold { .. } => "derivative_threshold",
        }
    }

    /// Checks the mode's parameters against the row arity they will be applied to.
    pub fn validate(&self, expected_fields: usize) -> Result<(), LoaderError> {
        if expected_fields == 0 {
            return Err(LoaderError::invalid_config(
                "expected_fields must be at least 1",
            ));
        }

        let check_column = |label: &str, column: usize| {
            if column >= expected_fields {
                Err(LoaderError::invalid_config(format!(
                    "{label} {column} is out of range for rows with {expected_fields} fields"
                )))
            } else {
                Ok(())
            }
        };

        match *self {
            FilterMode::Passthrough => Ok(()),
            FilterMode::OffsetCalibrated {
                reference_column,
                measured_column,
                sentinel,
            } => {
                check_column("reference column", reference_column)?;
                check_column("measured column", measured_column)?;
                if !sentinel.is_finite() {
                    return Err(LoaderError::invalid_config(format!(
                        "calibration sentinel must be finite, got {sentinel}"
                    )));
                }
                Ok(())
            }
            FilterMode::MovingAverage { window } => {
                if window == 0 {
                    return Err(LoaderError::invalid_config(
                        "moving average window must be at least 1",
                    ));
                }
                Ok(())
            }
            FilterMode::DerivativeThreshold {
                time_column,
                value_column,
                limit,
            } => {
                check_column("time column", time_column)?;
                check_column("value column", value_column)?;
                if !limit.is_finite() || limit <= 0.0 {
                    return Err(LoaderError::invalid_config(format!(
                        "derivative limit must be a positive number, got {limit}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Validates the mode for rows of `expected_fields` and builds its filter.
    pub fn build(&self, expected_fields: usize) -> Result<Box<dyn RowFilter>, LoaderError> {
        self.validate(expected_fields)?;

        let filter: Box<dyn RowFilter> = match *self {
            FilterMode::Passthrough => Box::new(PassthroughFilter),
            FilterMode::OffsetCalibrated {
                reference_column,
                measured_column,
                sentinel,
            } => Box::new(OffsetCalibrationFilter::new(
                reference_column,
                measured_column,
                sentinel,
            )),
            FilterMode::MovingAverage { window } => Box::new(MovingAverageFilter::new(window)),
            FilterMode::DerivativeThreshold {
                time_column,
                value_column,
                limit,
            } => Box::new(DerivativeThresholdFilter::new(
                time_column,
                value_column,
                limit,
            )),
        };
        Ok(filter)
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Passthrough => f.write_str("passthrough"),
            FilterMode::OffsetCalibrated {
                reference_column,
                measured_column,
                sentinel,
            } => write!(
                f,
                "offset calibrated (reference col {reference_column}, measured col {measured_column}, sentinel {sentinel})"
            ),
            FilterMode::MovingAverage { window } => write!(f, "moving average (window {window})"),
            FilterMode::DerivativeThreshold {
                time_column,
                value_column,
                limit,
            } => write!(
                f,
                "derivative threshold (d col{value_column} / d col{time_column} < {limit})"
            ),
        }
    }
}
