//! Path-addressed measurement storage.
//!
//! A recursively nested mapping from string keys to either a
//! sub-mapping or a live accumulator point. Levels are created lazily
//! as measurements arrive; an empty path addresses the tree root.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde_json::Value;
use tracing::warn;

use lookout_stats::{Point, PointCtor};

enum Node {
    Branch(HashMap<String, Node>),
    Leaf(Box<dyn Point>),
}

/// One process's accumulated measurements for the current window.
#[derive(Default)]
pub struct MeasurementTree {
    root: HashMap<String, Node>,
}

impl MeasurementTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Create or update the point at `path`/`id`.
    ///
    /// Missing levels along `path` are created as empty sub-mappings.
    /// If a point already exists at the terminal `id` it is updated in
    /// place; otherwise `ctor` builds a fresh one. A key that is
    /// already occupied by the other node kind cannot be descended
    /// into or overwritten; the measurement is dropped with a warning.
    pub fn augment(
        &mut self,
        path: &[&str],
        id: &str,
        ctor: PointCtor,
        raw: &Value,
        timestamp_ms: u64,
        scale_factor: f64,
        interval_ms: u64,
    ) {
        let mut level = &mut self.root;
        for step in path {
            match level
                .entry((*step).to_string())
                .or_insert_with(|| Node::Branch(HashMap::new()))
            {
                Node::Branch(children) => level = children,
                Node::Leaf(_) => {
                    warn!(step, id, "path step occupied by a point; measurement dropped");
                    return;
                }
            }
        }

        match level.entry(id.to_string()) {
            Entry::Occupied(mut occupied) => match occupied.get_mut() {
                Node::Leaf(point) => point.update(raw, timestamp_ms),
                Node::Branch(_) => {
                    warn!(id, "id occupied by a sub-mapping; measurement dropped");
                }
            },
            Entry::Vacant(vacant) => {
                vacant.insert(Node::Leaf(ctor(raw, timestamp_ms, scale_factor, interval_ms)));
            }
        }
    }

    /// Reset every live point in place for a new window.
    ///
    /// Used in persistent mode, where points keep their identity across
    /// boundaries.
    pub fn reset_all(&mut self, timestamp_ms: u64) {
        fn reset_level(level: &mut HashMap<String, Node>, timestamp_ms: u64) {
            for node in level.values_mut() {
                match node {
                    Node::Branch(children) => reset_level(children, timestamp_ms),
                    Node::Leaf(point) => point.reset(timestamp_ms),
                }
            }
        }

        reset_level(&mut self.root, timestamp_ms);
    }

    /// Snapshot the tree as plain JSON, materializing every point's
    /// computed fields.
    pub fn serialize(&self) -> Value {
        fn serialize_level(level: &HashMap<String, Node>) -> Value {
            let map = level
                .iter()
                .map(|(key, node)| {
                    let value = match node {
                        Node::Branch(children) => serialize_level(children),
                        Node::Leaf(point) => point.serialize(),
                    };
                    (key.clone(), value)
                })
                .collect();
            Value::Object(map)
        }

        serialize_level(&self.root)
    }
}
