//! Aggregation — merging per-source snapshots into one document.
//!
//! Coordinator-only. Every delivery cycle owns a fresh
//! [`AggregateDocument`]; snapshots from the coordinator itself
//! (source `master`) and from workers are transformed and merged in as
//! they arrive, and the delivery loop takes the document on its
//! phase-shifted cadence.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value, json};

/// Where a snapshot came from, unique within one delivery cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceId {
    /// The coordinating (or standalone) process.
    Master,
    /// A worker, by its group identifier.
    Worker(String),
}

/// Pluggable snapshot transform applied before merging.
pub type Transform = Arc<dyn Fn(Value, &SourceId) -> Value + Send + Sync>;

/// The merged per-source document delivered to the consumer each
/// cycle.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregateDocument {
    pub id: u32,
    pub name: String,
    /// Interval length divided by the scale factor.
    pub interval: f64,
    /// Per-source mapping built by the merge algorithm.
    pub data: Value,
}

/// The default transform: nest the coordinator's snapshot under
/// `master` and a worker's under `workers.<source>`.
pub fn default_transform(snapshot: Value, source: &SourceId) -> Value {
    match source {
        SourceId::Master => json!({ "master": snapshot }),
        SourceId::Worker(id) => {
            let mut workers = Map::new();
            workers.insert(id.clone(), snapshot);
            json!({ "workers": workers })
        }
    }
}

/// Merge `partial` into `target`.
///
/// Union on new keys, recursion on shared keys, and first-writer-wins
/// on overlapping leaves: once `target` holds a non-mapping value at a
/// key, nothing `partial` carries for that key — whatever its shape —
/// replaces it.
pub fn merge(target: &mut Value, partial: &Value) {
    let Some(partial) = partial.as_object() else {
        return;
    };
    let Some(target) = target.as_object_mut() else {
        return;
    };

    for (key, value) in partial {
        match target.get_mut(key) {
            Some(existing) => merge(existing, value),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Owns the aggregate document between deliveries.
pub struct AggregationEngine {
    id: u32,
    name: String,
    interval: f64,
    transform: Transform,
    document: AggregateDocument,
}

impl AggregationEngine {
    pub fn new(id: u32, name: &str, interval_ms: u64, scale_factor: f64, transform: Transform) -> Self {
        let interval = interval_ms as f64 / scale_factor;
        Self {
            id,
            name: name.to_string(),
            interval,
            transform,
            document: fresh_document(id, name, interval),
        }
    }

    /// Transform a source snapshot and merge it into the document.
    pub fn fold(&mut self, snapshot: Value, source: &SourceId) {
        let partial = (self.transform)(snapshot, source);
        merge(&mut self.document.data, &partial);
    }

    /// Hand the current document to the delivery loop and start a
    /// fresh one.
    pub fn take(&mut self) -> AggregateDocument {
        let next = fresh_document(self.id, &self.name, self.interval);
        std::mem::replace(&mut self.document, next)
    }

    /// The document under construction (not consumed).
    pub fn document(&self) -> &AggregateDocument {
        &self.document
    }
}

fn fresh_document(id: u32, name: &str, interval: f64) -> AggregateDocument {
    AggregateDocument {
        id,
        name: name.to_string(),
        interval,
        data: Value::Object(Map::new()),
    }
}
