//! Collector configuration.

use crate::aggregate::Transform;

/// Default window length: 10 seconds.
pub const DEFAULT_INTERVAL_MS: i64 = 10_000;

/// Configuration for one collector instance.
///
/// Invalid values are never fatal — anything absent or out of range
/// falls back to its default at construction time.
#[derive(Clone, Default)]
pub struct CollectorConfig {
    /// Name carried on the delivered aggregate document.
    pub name: String,
    /// Epoch-ms hint all processes share so their window boundaries
    /// align. Defaults to epoch 0.
    pub start_time_hint: i64,
    /// Window length in milliseconds. Non-positive falls back to
    /// [`DEFAULT_INTERVAL_MS`].
    pub interval_ms: i64,
    /// Rate scale factor: 1 → per-millisecond, 1000 → per-second.
    /// Non-positive or non-finite falls back to 1.
    pub scale_factor: f64,
    /// Keep points across window boundaries, resetting them in place,
    /// instead of discarding the tree each window.
    pub persist: bool,
    /// Snapshot transform applied before merging; `None` uses the
    /// master/workers nesting of
    /// [`crate::aggregate::default_transform`].
    pub transform: Option<Transform>,
}

impl CollectorConfig {
    /// Interval with the default applied.
    pub(crate) fn resolved_interval_ms(&self) -> u64 {
        if self.interval_ms > 0 {
            self.interval_ms as u64
        } else {
            DEFAULT_INTERVAL_MS as u64
        }
    }

    /// Scale factor with the default applied.
    pub(crate) fn resolved_scale_factor(&self) -> f64 {
        if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied_for_invalid_values() {
        let config = CollectorConfig::default();
        assert_eq!(config.resolved_interval_ms(), 10_000);
        assert_eq!(config.resolved_scale_factor(), 1.0);
        assert_eq!(config.start_time_hint, 0);
        assert!(!config.persist);
    }

    #[test]
    fn negative_interval_falls_back() {
        let config = CollectorConfig {
            interval_ms: -5,
            ..Default::default()
        };
        assert_eq!(config.resolved_interval_ms(), 10_000);
    }

    #[test]
    fn non_finite_scale_falls_back() {
        let config = CollectorConfig {
            scale_factor: f64::NAN,
            ..Default::default()
        };
        assert_eq!(config.resolved_scale_factor(), 1.0);

        let config = CollectorConfig {
            scale_factor: -2.0,
            ..Default::default()
        };
        assert_eq!(config.resolved_scale_factor(), 1.0);
    }

    #[test]
    fn valid_values_pass_through() {
        let config = CollectorConfig {
            interval_ms: 250,
            scale_factor: 1000.0,
            ..Default::default()
        };
        assert_eq!(config.resolved_interval_ms(), 250);
        assert_eq!(config.resolved_scale_factor(), 1000.0);
    }
}
