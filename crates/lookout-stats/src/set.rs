//! Last-writer-wins point for values of any JSON type.

use serde_json::{Value, json};

use crate::point::Point;

/// Stores the most recently written value verbatim.
///
/// Unlike every other point type, `reset` only advances the recorded
/// timestamp — the stored value survives window boundaries until it is
/// explicitly overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct SetPoint {
    value: Value,
    timestamp: u64,
}

impl SetPoint {
    pub fn new(value: Value, timestamp_ms: u64) -> Self {
        Self {
            value,
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
        Box::new(Self::new(raw.clone(), timestamp_ms))
    }
}

impl Point for SetPoint {
    fn update(&mut self, raw: &Value, timestamp_ms: u64) {
        self.value = raw.clone();
        self.timestamp = timestamp_ms;
    }

    fn reset(&mut self, timestamp_ms: u64) {
        // The value is deliberately kept.
        self.timestamp = timestamp_ms;
    }

    fn serialize(&self) -> Value {
        json!({
            "type": "set",
            "value": { "val": self.value, "timeStamp": self.timestamp },
        })
    }
}
