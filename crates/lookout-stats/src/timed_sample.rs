//! Windowed sample over duration pairs.

use serde_json::{Value, json};

use crate::point::Point;
use crate::sample::WindowStats;

/// Like [`crate::SamplePoint`], but each raw input is a duration
/// expressed as a `[whole, fraction]` pair of units.
///
/// The pair is converted exactly once on the way in:
/// `time = (whole + fraction) * 1000 / scale_factor`, after which the
/// same min/max/average/sigma logic applies. Malformed pairs are
/// rejected by the collector's operation registry and never reach this
/// point.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSamplePoint {
    stats: WindowStats,
    scale_factor: f64,
    timestamp: u64,
}

impl TimedSamplePoint {
    pub fn new(raw: &Value, timestamp_ms: u64, scale_factor: f64) -> Self {
        Self {
            stats: WindowStats::new(convert(raw, scale_factor)),
            scale_factor,
            timestamp: timestamp_ms,
        }
    }

    /// `PointCtor`-compatible constructor.
    pub fn construct(
        raw: &Value,
        timestamp_ms: u64,
        scale_factor: f64,
        _interval_ms: u64,
    ) -> Box<dyn Point> {
        Box::new(Self::new(raw, timestamp_ms, scale_factor))
    }
}

impl Point for TimedSamplePoint {
    fn update(&mut self, raw: &Value, timestamp_ms: u64) {
        self.stats.observe(convert(raw, self.scale_factor));
        self.timestamp = timestamp_ms;
    }

    fn reset(&mut self, timestamp_ms: u64) {
        self.stats.clear();
        self.timestamp = timestamp_ms;
    }

    fn serialize(&self) -> Value {
        json!({
            "type": "timedSample",
            "value": {
                "min": self.stats.min,
                "max": self.stats.max,
                "sigma": self.stats.sigma_value(),
                "average": self.stats.average_value(),
                "scaleFactor": self.scale_factor,
                "timeStamp": self.timestamp,
            },
        })
    }
}

fn convert(raw: &Value, scale_factor: f64) -> f64 {
    let whole = raw.get(0).and_then(Value::as_f64).unwrap_or(f64::NAN);
    let fraction = raw.get(1).and_then(Value::as_f64).unwrap_or(f64::NAN);
    (whole + fraction) * 1000.0 / scale_factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_pair_once() {
        // (2 + 0.5) * 1000 / 1000 = 2.5
        let point = TimedSamplePoint::new(&json!([2.0, 0.5]), 0, 1000.0);
        let out = point.serialize();
        assert_eq!(out["type"], "timedSample");
        assert_eq!(out["value"]["min"], 2.5);
        assert_eq!(out["value"]["max"], 2.5);
        assert_eq!(out["value"]["average"], 2.5);
        assert_eq!(out["value"]["scaleFactor"], 1000.0);
    }

    #[test]
    fn stats_operate_on_converted_values() {
        let mut point = TimedSamplePoint::new(&json!([1.0, 0.0]), 0, 1000.0);
        point.update(&json!([3.0, 0.0]), 1);

        let out = point.serialize();
        assert_eq!(out["value"]["min"], 1.0);
        assert_eq!(out["value"]["max"], 3.0);
        assert_eq!(out["value"]["average"], 2.0);
    }

    #[test]
    fn reset_then_update_reinitializes() {
        let mut point = TimedSamplePoint::new(&json!([1.0, 0.0]), 0, 1000.0);
        point.reset(5);

        let cleared = point.serialize();
        assert_eq!(cleared["value"]["min"], Value::Null);
        assert_eq!(cleared["value"]["average"], Value::Null);

        point.update(&json!([4.0, 0.0]), 6);
        let out = point.serialize();
        assert_eq!(out["value"]["min"], 4.0);
        assert_eq!(out["value"]["max"], 4.0);
        assert_eq!(out["value"]["sigma"], Value::Null);
    }
}
