//! Explicit instance identity for collectors sharing a channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Hands out sequential instance ids to the collectors composed by one
/// owner.
///
/// Workers and the coordinator construct their collectors in the same
/// order, so matching positions receive matching ids and a worker's
/// snapshot reaches exactly the coordinator instance it belongs to.
/// The registry is owned by whichever component composes collectors —
/// there is no hidden process-global counter.
#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    next: Arc<AtomicU32>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next instance id.
    pub fn allocate(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of instances allocated so far.
    pub fn count(&self) -> u32 {
        self.next.load(Ordering::Relaxed)
    }
}
