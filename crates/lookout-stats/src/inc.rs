//! Windowed counter, serialized as a rate.

use serde_json::{Value, json};

use crate::point::Point;

/// A counter accumulated over one measurement window.
///
/// The point keeps a copy of the interval length and scale factor so
/// the serialized value is a rate: `total * scale_factor /
/// interval_ms`. With `scale_factor = 1` and a 1000 ms interval that
/// yields events per second.
///
/// A non-finite or absent delta counts as an implicit
/// increment-by-one, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct IncPoint {
    total: f64,
    timestamp: u64,
    scale_factor: f64,
    interval_ms: u64,
}

impl IncPoint {
    pub fn new(raw: &Value, timestamp_ms: u64, scale_factor: f64, interval_ms: u64) -> Self {
        Self {
            total: finite_or_one(raw),
            timestamp: timestamp_ms,
            scale_factor,
            interval_ms,
        }
    }

    /// `PointCtor`-compatible constructor.
    pub fn construct(
        raw: &Value,
        timestamp_ms: u64,
        scale_factor: f64,
        interval_ms: u64,
    ) -> Box<dyn Point> {
        Box::new(Self::new(raw, timestamp_ms, scale_factor, interval_ms))
    }

    /// The raw accumulated total (not rate-converted).
    pub fn total(&self) -> f64 {
        self.total
    }
}

impl Point for IncPoint {
    fn update(&mut self, raw: &Value, timestamp_ms: u64) {
        self.total += finite_or_one(raw);
        self.timestamp = timestamp_ms;
    }

    fn reset(&mut self, timestamp_ms: u64) {
        self.total = 0.0;
        self.timestamp = timestamp_ms;
    }

    fn serialize(&self) -> Value {
        let rate = self.scale_factor * self.total / self.interval_ms as f64;
        json!({
            "type": "inc",
            "value": { "val": rate, "timeStamp": self.timestamp },
        })
    }
}

fn finite_or_one(raw: &Value) -> f64 {
    raw.as_f64().filter(|v| v.is_finite()).unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_rate() {
        // total 5 over a 1000 ms interval at scale 1 → 0.005/ms... with
        // scale 1000 → 5 per second.
        let point = IncPoint::new(&json!(5), 0, 1000.0, 1000);
        assert_eq!(point.serialize()["value"]["val"], 5.0);
    }

    #[test]
    fn non_finite_delta_counts_as_one() {
        let mut point = IncPoint::new(&Value::Null, 0, 1.0, 1);
        assert_eq!(point.total(), 1.0);

        point.update(&json!("not a number"), 1);
        assert_eq!(point.total(), 2.0);

        point.update(&Value::Null, 2);
        assert_eq!(point.total(), 3.0);

        point.update(&json!(4), 3);
        assert_eq!(point.total(), 7.0);
    }

    #[test]
    fn reset_zeroes_total() {
        let mut point = IncPoint::new(&json!(5), 0, 1.0, 1);
        point.reset(10);

        let out = point.serialize();
        assert_eq!(out["value"]["val"], 0.0);
        assert_eq!(out["value"]["timeStamp"], 10);
    }

    #[test]
    fn zero_initializer_is_kept() {
        // Zero is a finite number and must not fall back to 1.
        let point = IncPoint::new(&json!(0), 0, 1.0, 1);
        assert_eq!(point.total(), 0.0);
    }
}
