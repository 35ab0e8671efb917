use super::RowFilter;

/// Block average over consecutive rows: every `window` rows collapse into one
/// row of per-field means. A trailing partial window is never emitted.
pub struct MovingAverageFilter {
    window: usize,
    count: usize,
    sums: Vec<f64>,
}

impl MovingAverageFilter {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            count: 0,
            sums: Vec::new(),
        }
    }

    /// Rows accumulated towards the current, not yet emitted, window.
    pub fn pending(&self) -> usize {
        self.count
    }

    fn reset(&mut self) {
        self.count = 0;
        self.sums.iter_mut().for_each(|sum| *sum = 0.0);
    }
}

impl RowFilter for MovingAverageFilter {
    fn name(&self) -> &'static str {
        "moving_average"
    }

    fn push(&mut self, row: Vec<f64>) -> Option<Vec<f64>> {
        if self.sums.len() != row.len() {
            self.sums = vec![0.0; row.len()];
        }
        for (sum, value) in self.sums.iter_mut().zip(&row) {
            *sum += value;
        }
        self.count += 1;

        if self.count < self.window {
            return None;
        }

        let divisor = self.window as f64;
        let averaged = self.sums.iter().map(|sum| sum / divisor).collect();
        self.reset();
        Some(averaged)
    }
}
