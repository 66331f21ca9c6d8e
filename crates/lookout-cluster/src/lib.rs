//! lookout-cluster — the process-group boundary.
//!
//! Collectors run in a group of cooperating processes: one coordinator
//! plus zero or more workers. This crate owns everything at that seam:
//!
//! ```text
//! ProcessGroup (trait)
//!   ├── role() → Coordinator | Worker { source_id }
//!   ├── take_workers() / take_joins() → WorkerLink streams
//!   └── forward() → worker → coordinator send primitive
//!
//! GroupMessage — the workerSample wire schema
//! InstanceRegistry — explicit per-composition instance identity
//! LocalGroup — in-process implementation for single-process
//!              topologies and tests
//! ```
//!
//! The transport itself is out of scope: a host embeds its own
//! `ProcessGroup` over whatever IPC it already has. Messages are
//! one-way and at-most-once; a lost snapshot is a data-completeness
//! issue, never an error.

pub mod error;
pub mod local;
pub mod message;
pub mod registry;
pub mod topology;

pub use error::{ClusterError, ClusterResult};
pub use local::{LocalGroup, LocalWorker};
pub use message::GroupMessage;
pub use registry::InstanceRegistry;
pub use topology::{ProcessGroup, ProcessRole, WorkerLink};
