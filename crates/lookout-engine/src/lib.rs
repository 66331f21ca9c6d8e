//! lookout-engine — window timing and measurement storage.
//!
//! Two pieces sit under every collector:
//!
//! ```text
//! IntervalScheduler
//!   ├── new(start_hint, interval, now) → phase-aligned first boundary
//!   └── tick(now) → WindowClose when a boundary has passed
//!
//! MeasurementTree
//!   ├── augment() → lazy path creation + point update
//!   ├── reset_all() → in-place window reset (persistent mode)
//!   └── serialize() → plain-JSON snapshot
//! ```
//!
//! The scheduler is a pure state machine over epoch milliseconds;
//! callers inject `now`, which keeps it deterministic under test and
//! lets the collector drive it from both its timer task and every
//! recording call.

pub mod scheduler;
pub mod tree;

pub use scheduler::{IntervalScheduler, WindowClose};
pub use tree::MeasurementTree;
