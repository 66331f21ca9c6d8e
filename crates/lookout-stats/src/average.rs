//! Running average over a measurement window.

/// Single-pass average: a running total and a count.
///
/// `count` is at least 1 — an `Average` only exists once a first
/// measurement has been taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Average {
    total: f64,
    count: u64,
}

impl Average {
    /// Initialize from the first measurement.
    pub fn new(first: f64) -> Self {
        Self {
            total: first,
            count: 1,
        }
    }

    /// Fold in a measurement.
    pub fn add(&mut self, measurement: f64) {
        self.count += 1;
        self.total += measurement;
    }

    /// The current average.
    pub fn value(&self) -> f64 {
        self.total / self.count as f64
    }

    /// Number of measurements folded in so far.
    pub fn count(&self) -> u64 {
        self.count
    }
}
