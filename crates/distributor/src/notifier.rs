//! Completion notifier - one notification per processed entry

use tracing::{debug, instrument};

use contracts::{ContractError, Notification, TopicHandle, TopicService};
use observability::record_notification_published;

/// Publishes completion notifications to the per-deployment output topic.
///
/// The topic is created idempotently on first use and the handle cached for
/// the rest of the run. One notification per processed entry, scoped to the
/// archival subscriber's channel pair regardless of total subscriber count.
pub struct Notifier<'a, T> {
    topics: &'a T,
    topic_name: String,
    cached: Option<TopicHandle>,
}

impl<'a, T: TopicService + Sync> Notifier<'a, T> {
    /// Create a notifier for the given output topic name.
    pub fn new(topics: &'a T, topic_name: String) -> Self {
        Self {
            topics,
            topic_name,
            cached: None,
        }
    }

    /// Publish one completion notification.
    #[instrument(
        name = "notifier_notify",
        skip(self, notification),
        fields(topic = %self.topic_name, queue = %notification.queue)
    )]
    pub async fn notify(&mut self, notification: &Notification) -> Result<(), ContractError> {
        let topic = match &self.cached {
            Some(handle) => handle.clone(),
            None => {
                let handle = self.topics.ensure_topic(&self.topic_name).await?;
                self.cached = Some(handle.clone());
                handle
            }
        };

        let message = serde_json::to_string(notification)
            .map_err(|e| ContractError::topic_publish(&self.topic_name, e.to_string()))?;
        self.topics.publish(&topic, &message).await?;
        record_notification_published();
        debug!("Completion notification published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backends::MemoryTopicService;

    fn notification() -> Notification {
        Notification {
            queue: "field-data-writer".into(),
            dead_letter_queue: "field-data-dlq-writer".into(),
        }
    }

    #[tokio::test]
    async fn test_notify_publishes_channel_pair() {
        let topics = MemoryTopicService::new();
        let mut notifier = Notifier::new(&topics, "outgoing-topic-highlands".to_string());

        notifier.notify(&notification()).await.unwrap();

        let published = topics.published("outgoing-topic-highlands");
        assert_eq!(published.len(), 1);
        let parsed: Notification = serde_json::from_str(&published[0]).unwrap();
        assert_eq!(parsed, notification());
    }

    #[tokio::test]
    async fn test_topic_handle_cached_across_notifications() {
        let topics = MemoryTopicService::new();
        let mut notifier = Notifier::new(&topics, "outgoing-topic-highlands".to_string());

        notifier.notify(&notification()).await.unwrap();
        notifier.notify(&notification()).await.unwrap();
        assert_eq!(topics.published("outgoing-topic-highlands").len(), 2);
    }

    #[tokio::test]
    async fn test_publish_failure_propagates() {
        let topics = MemoryTopicService::new().fail_publish_to("outgoing-topic-highlands");
        let mut notifier = Notifier::new(&topics, "outgoing-topic-highlands".to_string());
        assert!(notifier.notify(&notification()).await.is_err());
    }
}
