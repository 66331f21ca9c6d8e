//! Wire schema for worker → coordinator snapshot messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message on the group channel, tagged by `event`.
///
/// `instance_id` identifies which collector instance the snapshot
/// belongs to, so multiple independent collectors can share one
/// message channel without cross-talk. `source_id` names the worker
/// within one delivery cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum GroupMessage {
    #[serde(rename = "workerSample", rename_all = "camelCase")]
    WorkerSample {
        instance_id: u32,
        source_id: String,
        /// The worker's serialized measurement tree.
        sample: Value,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_format_is_camel_case_and_event_tagged() {
        let msg = GroupMessage::WorkerSample {
            instance_id: 3,
            source_id: "w1".to_string(),
            sample: json!({"k": 1}),
        };

        let wire = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            wire,
            json!({
                "event": "workerSample",
                "instanceId": 3,
                "sourceId": "w1",
                "sample": {"k": 1},
            })
        );
    }

    #[test]
    fn round_trips() {
        let wire = json!({
            "event": "workerSample",
            "instanceId": 0,
            "sourceId": "7",
            "sample": {},
        });

        let msg: GroupMessage = serde_json::from_value(wire).unwrap();
        let GroupMessage::WorkerSample { instance_id, source_id, .. } = msg;
        assert_eq!(instance_id, 0);
        assert_eq!(source_id, "7");
    }
}
