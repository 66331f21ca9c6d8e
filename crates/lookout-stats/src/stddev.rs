//! Running standard deviation via Welford's online method.

/// Single-pass standard deviation estimator.
///
/// Welford's method keeps O(1) state and is resistant to round-off
/// error, unlike the naive sum-of-squares formulation. `count` is at
/// least 1; the estimate is undefined until a second measurement
/// arrives, in which case [`StandardDeviation::value`] returns `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardDeviation {
    count: u64,
    mean: f64,
    sum_sq: f64,
}

impl StandardDeviation {
    /// Initialize from the first measurement.
    pub fn new(first: f64) -> Self {
        Self {
            count: 1,
            mean: first,
            sum_sq: 0.0,
        }
    }

    /// Fold in a measurement, updating the stepwise parameters.
    pub fn add(&mut self, measurement: f64) {
        let delta = measurement - self.mean;
        self.count += 1;
        self.mean += delta / self.count as f64;
        self.sum_sq += delta * (measurement - self.mean);
    }

    /// The current estimate, or `None` when fewer than two
    /// measurements have been taken.
    pub fn value(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        Some((self.sum_sq / (self.count - 1) as f64).sqrt())
    }
}
