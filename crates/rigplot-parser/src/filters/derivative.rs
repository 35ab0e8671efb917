use tracing::trace;

use super::RowFilter;

/// Rejects rows whose rate of change against the previous raw row is not
/// strictly below `limit`.
///
/// The reference row advances on every pushed row, including rejected ones,
/// so a single spike removes only the spike itself. A zero time step produces
/// a non-finite rate and is rejected. Rows missing either column are dropped
/// and do not move the reference.
pub struct DerivativeThresholdFilter {
    time_column: usize,
    value_column: usize,
    limit: f64,
    last: Option<(f64, f64)>,
}

impl DerivativeThresholdFilter {
    pub fn new(time_column: usize, value_column: usize, limit: f64) -> Self {
        Self {
            time_column,
            value_column,
            limit,
            last: None,
        }
    }

    fn rate(&self, time: f64, value: f64) -> Option<f64> {
        self.last
            .map(|(last_time, last_value)| (value - last_value) / (time - last_time))
    }
}

impl RowFilter for DerivativeThresholdFilter {
    fn name(&self) -> &'static str {
        "derivative_threshold"
    }

    fn push(&mut self, row: Vec<f64>) -> Option<Vec<f64>> {
        let (Some(&time), Some(&value)) = (row.get(self.time_column), row.get(self.value_column))
        else {
            trace!(fields = row.len(), "row too narrow for derivative columns");
            return None;
        };

        let accepted = match self.rate(time, value) {
            None => true,
            Some(rate) => rate.abs() < self.limit,
        };
        self.last = Some((time, value));

        accepted.then_some(row)
    }
}
