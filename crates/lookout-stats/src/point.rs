//! The `Point` trait — the update/reset/serialize contract shared by
//! every accumulator type.

use serde_json::Value;

/// A single accumulator instance living at one path+id in a
/// measurement tree.
///
/// `update` folds a new raw value in, `reset` starts a new window in
/// place (persistent mode only), and `serialize` materializes the
/// current state as a plain `{type, value}` JSON object.
pub trait Point: Send {
    /// Fold a raw recorded value into the accumulator.
    ///
    /// The raw value has already been validated by the collector's
    /// operation registry; `timestamp_ms` is the end of the current
    /// measurement window.
    fn update(&mut self, raw: &Value, timestamp_ms: u64);

    /// Begin a new window without discarding point identity.
    fn reset(&mut self, timestamp_ms: u64);

    /// Materialize the accumulator as `{type, value}` JSON.
    fn serialize(&self) -> Value;
}

/// Uniform constructor signature for all point types, so operations can
/// be registered as plain function pointers.
///
/// Arguments: raw value, window-end timestamp (ms), scale factor,
/// interval length (ms).
pub type PointCtor = fn(&Value, u64, f64, u64) -> Box<dyn Point>;
