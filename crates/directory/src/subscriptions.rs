//! Legacy subscription-enumeration directory strategy

use tracing::{debug, instrument};

use contracts::{outgoing_topic_name, ContractError, SubscriberId, TopicService};

use crate::Directory;

/// Directory backed by topic-subscription enumeration (legacy).
///
/// Follows the listing's continuation token until absent, concatenating
/// pages; the subscriber id is the trailing segment of each subscription
/// identifier. Kept for deployments that have not migrated to fleet tags.
pub struct SubscriptionDirectory<T> {
    topics: T,
    archival: SubscriberId,
}

impl<T> SubscriptionDirectory<T> {
    /// Create a directory over the given topic service.
    pub fn new(topics: T, archival: SubscriberId) -> Self {
        Self { topics, archival }
    }
}

impl<T: TopicService + Sync> Directory for SubscriptionDirectory<T> {
    #[instrument(name = "subscription_directory_resolve", skip(self), fields(label = %task_label))]
    async fn resolve(&self, task_label: &str) -> Result<Vec<SubscriberId>, ContractError> {
        let topic = self
            .topics
            .ensure_topic(&outgoing_topic_name(task_label))
            .await?;

        let mut subscribers = Vec::new();
        let mut page_token = None;
        loop {
            let page = self
                .topics
                .list_subscriptions(&topic, page_token)
                .await?;
            subscribers.extend(
                page.subscriptions
                    .iter()
                    .map(|s| SubscriberId::new(s.subscriber_id())),
            );
            match page.next_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        subscribers.push(self.archival.clone());

        debug!(subscribers = subscribers.len(), "Subscriber set resolved");
        Ok(subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backends::MemoryTopicService;
    use contracts::Subscription;

    fn subscription(id: &str) -> Subscription {
        Subscription {
            arn: format!("mem:sub:outgoing-topic-highlands:{id}"),
            protocol: "sqs".into(),
            endpoint: format!("endpoint-{id}"),
        }
    }

    #[tokio::test]
    async fn test_concatenates_all_pages() {
        let topics = MemoryTopicService::with_page_size(2);
        topics.set_subscriptions(
            "outgoing-topic-highlands",
            vec![subscription("a"), subscription("b"), subscription("c")],
        );

        let directory =
            SubscriptionDirectory::new(topics, SubscriberId::new("persistent-database-writer"));
        let subscribers = directory.resolve("highlands").await.unwrap();

        assert_eq!(subscribers.len(), 4);
        assert_eq!(subscribers[0], "a");
        assert_eq!(subscribers[1], "b");
        assert_eq!(subscribers[2], "c");
        assert_eq!(subscribers[3], "persistent-database-writer");
    }

    #[tokio::test]
    async fn test_no_subscriptions_resolves_to_archival_only() {
        let topics = MemoryTopicService::new();
        let directory =
            SubscriptionDirectory::new(topics, SubscriberId::new("persistent-database-writer"));
        let subscribers = directory.resolve("highlands").await.unwrap();
        assert_eq!(subscribers.len(), 1);
    }
}
