//! Windowed numeric sample: min, max, average, standard deviation.

use serde_json::{Value, json};

use crate::average::Average;
use crate::point::Point;
use crate::stddev::StandardDeviation;

/// The min/max/average/sigma state shared by [`SamplePoint`] and
/// [`crate::TimedSamplePoint`].
///
/// All four fields start uninitialized; the first observation after
/// construction or a reset initializes them all, so a reset point
/// behaves exactly like a fresh one.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct WindowStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sigma: Option<StandardDeviation>,
    pub average: Option<Average>,
}

impl WindowStats {
    pub fn new(first: f64) -> Self {
        Self {
            min: Some(first),
            max: Some(first),
            sigma: Some(StandardDeviation::new(first)),
            average: Some(Average::new(first)),
        }
    }

    pub fn observe(&mut self, value: f64) {
        self.min = Some(match self.min {
            Some(min) => min.min(value),
            None => value,
        });
        self.max = Some(match self.max {
            Some(max) => max.max(value),
            None => value,
        });

        match &mut self.sigma {
            Some(sigma) => sigma.add(value),
            None => self.sigma = Some(StandardDeviation::new(value)),
        }
        match &mut self.average {
            Some(average) => average.add(value),
            None => self.average = Some(Average::new(value)),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Materialized sigma: `None` until two observations exist.
    pub fn sigma_value(&self) -> Option<f64> {
        self.sigma.as_ref().and_then(StandardDeviation::value)
    }

    pub fn average_value(&self) -> Option<f64> {
        self.average.as_ref().map(Average::value)
    }
}

/// Point for samples where min, max, average, and standard deviation
/// are all relevant.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePoint {
    stats: WindowStats,
    timestamp: u64,
}

impl SamplePoint {
    pub fn new(first: f64, timestamp_ms: u64) -> Self {
        Self {
            stats: WindowStats::new(first),
            timestamp: timestamp_ms,
        }
    }

    /// `PointCtor`-compatible constructor.
    pub fn construct(
        raw: &Value,
        timestamp_ms: u64,
        _scale_factor: f64,
        _interval_ms: u64,
    ) -> Box<dyn Point> {
        Box::new(Self::new(numeric(raw), timestamp_ms))
    }
}

impl Point for SamplePoint {
    fn update(&mut self, raw: &Value, timestamp_ms: u64) {
        self.stats.observe(numeric(raw));
        self.timestamp = timestamp_ms;
    }

    fn reset(&mut self, timestamp_ms: u64) {
        self.stats.clear();
        self.timestamp = timestamp_ms;
    }

    fn serialize(&self) -> Value {
        json!({
            "type": "sample",
            "value": {
                "min": self.stats.min,
                "max": self.stats.max,
                "sigma": self.stats.sigma_value(),
                "average": self.stats.average_value(),
                "timeStamp": self.timestamp,
            },
        })
    }
}

/// Raw values reaching a sample point have been validated as finite
/// numbers by the collector's operation registry.
fn numeric(raw: &Value) -> f64 {
    raw.as_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_initializes_everything() {
        let mut point = SamplePoint::new(1.0, 0);
        point.update(&json!(1.0), 0);

        let out = point.serialize();
        assert_eq!(out["value"]["min"], 1.0);
        assert_eq!(out["value"]["max"], 1.0);
        assert_eq!(out["value"]["sigma"], 0.0);
        assert_eq!(out["value"]["average"], 1.0);
    }

    #[test]
    fn extrema_and_average_track_updates() {
        let mut point = SamplePoint::new(3.0, 0);
        point.update(&json!(1.0), 1);
        point.update(&json!(5.0), 2);

        let out = point.serialize();
        assert_eq!(out["value"]["min"], 1.0);
        assert_eq!(out["value"]["max"], 5.0);
        assert_eq!(out["value"]["average"], 3.0);
        assert_eq!(out["value"]["timeStamp"], 2);
    }

    #[test]
    fn reset_clears_all_stats() {
        let mut point = SamplePoint::new(1.0, 0);
        point.update(&json!(2.0), 0);
        point.reset(10);

        let out = point.serialize();
        assert_eq!(out["value"]["min"], Value::Null);
        assert_eq!(out["value"]["max"], Value::Null);
        assert_eq!(out["value"]["sigma"], Value::Null);
        assert_eq!(out["value"]["average"], Value::Null);
        assert_eq!(out["value"]["timeStamp"], 10);
    }

    #[test]
    fn update_after_reset_reinitializes() {
        let mut point = SamplePoint::new(1.0, 0);
        point.reset(10);
        point.update(&json!(2.0), 11);

        let out = point.serialize();
        assert_eq!(out["value"]["min"], 2.0);
        assert_eq!(out["value"]["max"], 2.0);
        assert_eq!(out["value"]["average"], 2.0);
        // A single post-reset observation has no deviation estimate.
        assert_eq!(out["value"]["sigma"], Value::Null);
    }

    #[test]
    fn sigma_is_null_for_one_value() {
        let point = SamplePoint::new(7.0, 0);
        assert_eq!(point.serialize()["value"]["sigma"], Value::Null);
    }
}
