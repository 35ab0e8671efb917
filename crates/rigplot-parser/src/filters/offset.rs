use tracing::{debug, trace};

use super::RowFilter;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationState {
    AwaitingCalibration,
    Calibrated { offset: f64 },
}

/// Holds rows back until the reference angle leaves its sentinel value, then
/// shifts the measured angle so both channels agree at that moment.
///
/// The row that establishes the offset is consumed and never emitted. Rows
/// missing either column are dropped without touching the state.
pub struct OffsetCalibrationFilter {
    reference_column: usize,
    measured_column: usize,
    sentinel: f64,
    state: CalibrationState,
}

impl OffsetCalibrationFilter {
    pub fn new(reference_column: usize, measured_column: usize, sentinel: f64) -> Self {
        Self {
            reference_column,
            measured_column,
            sentinel,
            state: CalibrationState::AwaitingCalibration,
        }
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }
}

impl RowFilter for OffsetCalibrationFilter {
    fn name(&self) -> &'static str {
        "offset_calibrated"
    }

    fn push(&mut self, mut row: Vec<f64>) -> Option<Vec<f64>> {
        let (Some(&reference), Some(&measured)) =
            (row.get(self.reference_column), row.get(self.measured_column))
        else {
            trace!(fields = row.len(), "row too narrow for calibration columns");
            return None;
        };

        match self.state {
            CalibrationState::AwaitingCalibration => {
                if reference != self.sentinel {
                    let offset = reference - measured;
                    debug!(offset, reference, "calibration offset established");
                    self.state = CalibrationState::Calibrated { offset };
                }
                None
            }
            CalibrationState::Calibrated { offset } => {
                row[self.measured_column] = measured + offset;
                Some(row)
            }
        }
    }
}
