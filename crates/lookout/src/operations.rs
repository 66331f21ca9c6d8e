//! Init-time-validated registry of recording operations.
//!
//! An operation pairs a point constructor with an optional input
//! validator. The four built-ins are pre-registered; embedders add
//! custom point types through [`OperationRegistry::register`], which
//! rejects name conflicts immediately — never at call time.

use std::collections::HashMap;

use serde_json::Value;

use lookout_stats::{IncPoint, PointCtor, SamplePoint, SetPoint, TimedSamplePoint};

use crate::error::{CollectorError, CollectorResult};

/// Input validator; a `false` return makes the recording call a silent
/// no-op that leaves all state untouched.
pub type Validator = fn(&Value) -> bool;

/// One named recording operation.
#[derive(Clone, Copy)]
pub struct Operation {
    pub ctor: PointCtor,
    pub validator: Option<Validator>,
}

/// Operation name → `{constructor, validator}`.
pub struct OperationRegistry {
    operations: HashMap<String, Operation>,
}

impl OperationRegistry {
    /// A registry holding the four built-in operations.
    pub fn with_builtins() -> Self {
        let mut registry = Self {
            operations: HashMap::new(),
        };

        // Names here are also the wire `type` tags.
        registry.insert("sample", SamplePoint::construct, Some(finite_number));
        registry.insert("timedSample", TimedSamplePoint::construct, Some(duration_pair));
        registry.insert("inc", IncPoint::construct, None);
        registry.insert("set", SetPoint::construct, None);
        registry
    }

    fn insert(&mut self, name: &str, ctor: PointCtor, validator: Option<Validator>) {
        self.operations
            .insert(name.to_string(), Operation { ctor, validator });
    }

    /// Register a custom operation.
    ///
    /// Fails if `name` is already taken, whether by a built-in or an
    /// earlier custom registration.
    pub fn register(
        &mut self,
        name: &str,
        ctor: PointCtor,
        validator: Option<Validator>,
    ) -> CollectorResult<()> {
        if self.operations.contains_key(name) {
            return Err(CollectorError::DuplicateOperation(name.to_string()));
        }
        self.insert(name, ctor, validator);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Operation> {
        self.operations.get(name).copied()
    }
}

/// Accepts only finite numbers.
pub fn finite_number(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

/// Accepts only two-element arrays of finite numbers.
pub fn duration_pair(value: &Value) -> bool {
    match value.as_array() {
        Some(pair) if pair.len() == 2 => pair
            .iter()
            .all(|v| v.as_f64().is_some_and(f64::is_finite)),
        _ => false,
    }
}
