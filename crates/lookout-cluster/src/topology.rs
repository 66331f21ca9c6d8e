//! The topology boundary a host must implement.

use tokio::sync::mpsc;

use crate::error::{ClusterError, ClusterResult};
use crate::message::GroupMessage;

/// Which role the current process plays in its group.
///
/// Injected at collector construction — the engine never inspects
/// ambient process state to guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessRole {
    /// Coordinating (or standalone) process: aggregates and delivers.
    Coordinator,
    /// Worker process: forwards snapshots to the coordinator.
    Worker {
        /// Identifies this worker within one delivery cycle.
        source_id: String,
    },
}

/// The coordinator's view of one live worker.
///
/// Worker exit is signaled by `messages` closing; the listener that
/// drains the channel tears itself down at that point, leaving any
/// already-merged contribution in the aggregate.
#[derive(Debug)]
pub struct WorkerLink {
    pub source_id: String,
    pub messages: mpsc::UnboundedReceiver<GroupMessage>,
}

/// The host topology provider.
///
/// Implementations wrap whatever process management and IPC the host
/// already has. The `take_*` methods hand over channel receivers and
/// are therefore one-shot: the first caller gets the stream, later
/// callers get nothing. One collector consumes them at construction.
pub trait ProcessGroup: Send + Sync {
    /// The current process's role.
    fn role(&self) -> ProcessRole;

    /// Links for workers already live at the time of the call.
    /// Coordinator only; one-shot.
    fn take_workers(&self) -> Vec<WorkerLink> {
        Vec::new()
    }

    /// Subscription for workers joining later. Coordinator only;
    /// one-shot.
    fn take_joins(&self) -> Option<mpsc::UnboundedReceiver<WorkerLink>> {
        None
    }

    /// Send a message to the coordinating process. Worker only.
    fn forward(&self, _message: GroupMessage) -> ClusterResult<()> {
        Err(ClusterError::WrongRole("coordinator"))
    }
}
