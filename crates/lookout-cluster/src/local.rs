//! In-process `ProcessGroup` implementation.
//!
//! Useful for single-process topologies (a standalone service that
//! still wants aggregate delivery) and for exercising the full
//! coordinator/worker pipeline in tests without real subprocesses.
//! A "worker" here is just a handle over an in-memory channel;
//! dropping it closes the channel, which the coordinator observes as
//! the worker exiting.

use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{ClusterError, ClusterResult};
use crate::message::GroupMessage;
use crate::topology::{ProcessGroup, ProcessRole, WorkerLink};

/// Coordinator side of an in-process group.
pub struct LocalGroup {
    joins_tx: mpsc::UnboundedSender<WorkerLink>,
    joins_rx: Mutex<Option<mpsc::UnboundedReceiver<WorkerLink>>>,
}

impl LocalGroup {
    pub fn new() -> Self {
        let (joins_tx, joins_rx) = mpsc::unbounded_channel();
        Self {
            joins_tx,
            joins_rx: Mutex::new(Some(joins_rx)),
        }
    }

    /// Register a worker and return its sending handle.
    ///
    /// Workers registered before the coordinator collector takes its
    /// join subscription are buffered in the channel, so nothing is
    /// lost to ordering.
    pub fn register_worker(&self, source_id: &str) -> LocalWorker {
        let (tx, rx) = mpsc::unbounded_channel();
        let link = WorkerLink {
            source_id: source_id.to_string(),
            messages: rx,
        };

        // Fails only when the coordinator has shut down; the worker
        // handle then sends into the void, which is the lossy contract.
        if self.joins_tx.send(link).is_ok() {
            debug!(source_id, "worker joined local group");
        }

        LocalWorker {
            source_id: source_id.to_string(),
            tx,
        }
    }
}

impl Default for LocalGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessGroup for LocalGroup {
    fn role(&self) -> ProcessRole {
        ProcessRole::Coordinator
    }

    fn take_joins(&self) -> Option<mpsc::UnboundedReceiver<WorkerLink>> {
        self.joins_rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

/// Worker side of an in-process group.
pub struct LocalWorker {
    source_id: String,
    tx: mpsc::UnboundedSender<GroupMessage>,
}

impl ProcessGroup for LocalWorker {
    fn role(&self) -> ProcessRole {
        ProcessRole::Worker {
            source_id: self.source_id.clone(),
        }
    }

    fn forward(&self, message: GroupMessage) -> ClusterResult<()> {
        self.tx
            .send(message)
            .map_err(|_| ClusterError::ChannelClosed)
    }
}
