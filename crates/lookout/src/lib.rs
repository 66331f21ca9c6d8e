//! lookout — embeddable metrics collection for process groups.
//!
//! One collector runs per process. Workers record into a local
//! measurement tree and forward a serialized snapshot at every window
//! boundary; the coordinator folds its own snapshot plus the workers'
//! into a single aggregate document and delivers it once per interval:
//!
//! ```text
//!   worker process                     coordinator process
//!  ┌──────────────────┐              ┌──────────────────────────┐
//!  │ Collector        │              │ Collector                │
//!  │  MeasurementTree │  snapshot    │  MeasurementTree         │
//!  │  IntervalSched.  │ ───────────▶ │  AggregationEngine       │
//!  └──────────────────┘ GroupMessage │        │ take()          │
//!                                    │        ▼                 │
//!                                    │  AggregateDocument ──────┼──▶ consumer
//!                                    └──────────────────────────┘
//! ```
//!
//! The process topology is injected through the
//! [`ProcessGroup`] trait; [`LocalGroup`] provides an in-process
//! implementation for standalone services and tests. Recording calls
//! (`sample`, `timed_sample`, `inc`, `set`, and dynamic [`Collector::record`])
//! are synchronous and never block on I/O.

pub mod aggregate;
pub mod collector;
pub mod config;
pub mod error;
pub mod operations;

pub use aggregate::{
    AggregateDocument, AggregationEngine, SourceId, Transform, default_transform, merge,
};
pub use collector::{Collector, WindowEvent};
pub use config::{CollectorConfig, DEFAULT_INTERVAL_MS};
pub use error::{CollectorError, CollectorResult};
pub use operations::{Operation, OperationRegistry, Validator, duration_pair, finite_number};

// The pieces an embedder wires a collector up with.
pub use lookout_cluster::{
    ClusterError, ClusterResult, GroupMessage, InstanceRegistry, LocalGroup, LocalWorker,
    ProcessGroup, ProcessRole, WorkerLink,
};
pub use lookout_engine::{IntervalScheduler, MeasurementTree, WindowClose};
pub use lookout_stats::{Point, PointCtor};
