//! DeploymentBlueprint - Config Loader output
//!
//! Describes one deployment of the pipeline: channel pair, batch bounds,
//! archival subscriber, directory strategy, malformed-entry policy.

use serde::{Deserialize, Serialize};

use crate::{ChannelName, ControlMessage, SubscriberId, TagFilter};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete deployment blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Deployment identity
    pub deployment: DeploymentSettings,

    /// Channel pair and receive tuning
    pub channels: ChannelSettings,

    /// Archival subscriber settings
    #[serde(default)]
    pub archival: ArchivalSettings,

    /// Subscriber directory settings
    #[serde(default)]
    pub directory: DirectorySettings,

    /// Processing policies
    #[serde(default)]
    pub policy: PolicySettings,
}

/// Deployment identity: the task label the live fleet is tagged with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentSettings {
    /// Deployment/task label (e.g. "highlands")
    pub label: String,
}

/// Channel pair and receive tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSettings {
    /// Incoming channel base name
    pub incoming: ChannelName,

    /// Incoming dead-letter channel name
    pub dead_letter: ChannelName,

    /// Entries read per invocation, 1..=10
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Visibility timeout for received entries (seconds)
    #[serde(default = "default_visibility_timeout")]
    pub visibility_timeout_secs: u32,

    /// Long-poll wait per receive call (seconds)
    #[serde(default = "default_wait_time")]
    pub wait_time_secs: u32,
}

fn default_batch_size() -> usize {
    10
}

fn default_visibility_timeout() -> u32 {
    30
}

fn default_wait_time() -> u32 {
    1
}

/// Archival subscriber settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivalSettings {
    /// Fixed subscriber id of the persistence sink
    #[serde(default = "default_archival_subscriber")]
    pub subscriber: SubscriberId,
}

impl Default for ArchivalSettings {
    fn default() -> Self {
        Self {
            subscriber: default_archival_subscriber(),
        }
    }
}

fn default_archival_subscriber() -> SubscriberId {
    SubscriberId::new("persistent-database-writer")
}

/// Subscriber resolution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryStrategy {
    /// Query live compute resources by deployment tag
    #[default]
    Fleet,
    /// Legacy: enumerate topic subscriptions with pagination
    Subscriptions,
}

/// Subscriber directory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySettings {
    /// Resolution strategy
    #[serde(default)]
    pub strategy: DirectoryStrategy,

    /// Tag key marking fleet membership
    #[serde(default = "default_filter_tag")]
    pub filter_tag: String,

    /// Tag key holding each resource's stable instance identifier
    #[serde(default = "default_identity_tag")]
    pub identity_tag: String,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            strategy: DirectoryStrategy::default(),
            filter_tag: default_filter_tag(),
            identity_tag: default_identity_tag(),
        }
    }
}

fn default_filter_tag() -> String {
    "fleet:task".to_string()
}

fn default_identity_tag() -> String {
    "fleet:instance".to_string()
}

/// Handling of entries whose body fails to parse.
///
/// The distributor is payload-agnostic, so the default forwards malformed
/// bodies opaquely; the other policies exist for deployments that want the
/// dead-letter decision made upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedEntryPolicy {
    /// Forward opaquely without inspecting the body
    #[default]
    Forward,
    /// Acknowledge and drop without forwarding
    DropAndAcknowledge,
    /// Skip without acknowledging; visibility timeout retries it
    LeaveForRedelivery,
}

/// Processing policies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySettings {
    /// Malformed-entry handling
    #[serde(default)]
    pub malformed: MalformedEntryPolicy,
}

impl DeploymentBlueprint {
    /// Control message for this deployment's own channel pair.
    pub fn control_message(&self) -> ControlMessage {
        ControlMessage {
            queue: self.channels.incoming.clone(),
            dead_letter_queue: self.channels.dead_letter.clone(),
        }
    }

    /// Tag filter for fleet-based directory resolution.
    pub fn tag_filter(&self) -> TagFilter {
        TagFilter::new(
            self.directory.filter_tag.clone(),
            self.deployment.label.clone(),
            self.directory.identity_tag.clone(),
        )
    }

    /// Name of this deployment's output topic.
    pub fn outgoing_topic(&self) -> String {
        crate::outgoing_topic_name(&self.deployment.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_blueprint() -> DeploymentBlueprint {
        DeploymentBlueprint {
            version: ConfigVersion::V1,
            deployment: DeploymentSettings {
                label: "Highlands".into(),
            },
            channels: ChannelSettings {
                incoming: "field-data".into(),
                dead_letter: "field-data-dlq".into(),
                batch_size: 10,
                visibility_timeout_secs: 30,
                wait_time_secs: 1,
            },
            archival: ArchivalSettings::default(),
            directory: DirectorySettings::default(),
            policy: PolicySettings::default(),
        }
    }

    #[test]
    fn test_control_message_uses_channel_pair() {
        let bp = sample_blueprint();
        let msg = bp.control_message();
        assert_eq!(msg.queue, "field-data");
        assert_eq!(msg.dead_letter_queue, "field-data-dlq");
    }

    #[test]
    fn test_outgoing_topic_lowercases_label() {
        let bp = sample_blueprint();
        assert_eq!(bp.outgoing_topic(), "outgoing-topic-highlands");
    }

    #[test]
    fn test_tag_filter_carries_label() {
        let bp = sample_blueprint();
        let filter = bp.tag_filter();
        assert_eq!(filter.filter_tag, "fleet:task");
        assert_eq!(filter.value, "Highlands");
        assert_eq!(filter.identity_tag, "fleet:instance");
    }

    #[test]
    fn test_defaults_from_minimal_json() {
        let json = r#"{
            "deployment": {"label": "highlands"},
            "channels": {"incoming": "field-data", "dead_letter": "field-data-dlq"}
        }"#;
        let bp: DeploymentBlueprint = serde_json::from_str(json).unwrap();
        assert_eq!(bp.channels.batch_size, 10);
        assert_eq!(bp.archival.subscriber, "persistent-database-writer");
        assert_eq!(bp.directory.strategy, DirectoryStrategy::Fleet);
        assert_eq!(bp.policy.malformed, MalformedEntryPolicy::Forward);
    }
}
