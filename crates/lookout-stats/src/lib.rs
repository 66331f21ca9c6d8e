//! lookout-stats — the accumulator point types.
//!
//! Every measurement recorded through a collector lands in one of four
//! point types, each implementing the [`Point`] trait:
//!
//! ```text
//! SetPoint        — last-written value, any JSON type
//! IncPoint        — windowed counter, serialized as a rate
//! SamplePoint     — min/max/average/standard deviation over a window
//! TimedSamplePoint — SamplePoint over converted duration pairs
//! ```
//!
//! `SamplePoint` and `TimedSamplePoint` share the single-pass [`Average`]
//! and [`StandardDeviation`] helpers (Welford's method, O(1) memory).
//!
//! Points serialize to plain JSON `{type, value}` objects so snapshots
//! carry materialized numbers, never live accumulator state.

pub mod average;
pub mod inc;
pub mod point;
pub mod sample;
pub mod set;
pub mod stddev;
pub mod timed_sample;

pub use average::Average;
pub use inc::IncPoint;
pub use point::{Point, PointCtor};
pub use sample::SamplePoint;
pub use set::SetPoint;
pub use stddev::StandardDeviation;
pub use timed_sample::TimedSamplePoint;
