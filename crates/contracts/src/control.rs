//! Control and notification message shapes
//!
//! The control message triggers one distribution run; the notification is
//! published once per processed entry, scoped to the archival subscriber.

use serde::{Deserialize, Serialize};

use crate::{ChannelName, SubscriberId};

/// Inbound control message: names the channel pair holding new data.
///
/// Wire shape: `{"queue": ..., "dead-letter-queue": ...}` (hyphenated key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    /// Incoming channel with new entries
    pub queue: ChannelName,

    /// Dead-letter channel paired with the incoming channel
    #[serde(rename = "dead-letter-queue")]
    pub dead_letter_queue: ChannelName,
}

impl ControlMessage {
    /// Derive the outgoing channel pair for one subscriber.
    pub fn derived_pair(&self, subscriber: &SubscriberId) -> (ChannelName, ChannelName) {
        (
            self.queue.derived(subscriber),
            self.dead_letter_queue.derived(subscriber),
        )
    }
}

/// Completion notification: the archival subscriber's outgoing channel pair.
///
/// Wire shape: `{"queue": ..., "dead_letter_queue": ...}` (underscored key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Derived outgoing channel holding the new copy
    pub queue: ChannelName,

    /// Derived outgoing dead-letter channel
    pub dead_letter_queue: ChannelName,
}

/// Name of the per-deployment output topic.
pub fn outgoing_topic_name(deployment: &str) -> String {
    format!("outgoing-topic-{}", deployment.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_message_wire_keys() {
        let json = r#"{"queue": "field-data", "dead-letter-queue": "field-data-dlq"}"#;
        let msg: ControlMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.queue, "field-data");
        assert_eq!(msg.dead_letter_queue, "field-data-dlq");

        let round = serde_json::to_string(&msg).unwrap();
        assert!(round.contains("dead-letter-queue"));
    }

    #[test]
    fn test_notification_wire_keys() {
        let n = Notification {
            queue: "field-data-writer".into(),
            dead_letter_queue: "field-data-dlq-writer".into(),
        };
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("dead_letter_queue"));
    }

    #[test]
    fn test_derived_pair() {
        let msg = ControlMessage {
            queue: "field-data".into(),
            dead_letter_queue: "field-data-dlq".into(),
        };
        let (q, dlq) = msg.derived_pair(&SubscriberId::new("writer"));
        assert_eq!(q, "field-data-writer");
        assert_eq!(dlq, "field-data-dlq-writer");
    }

    #[test]
    fn test_outgoing_topic_name_lowercases() {
        assert_eq!(outgoing_topic_name("Highlands"), "outgoing-topic-highlands");
    }
}
