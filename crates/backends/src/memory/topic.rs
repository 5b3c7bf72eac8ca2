//! In-memory topic service

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::instrument;

use contracts::{ContractError, Subscription, SubscriptionPage, TopicHandle, TopicService};

#[derive(Debug, Default)]
struct TopicState {
    published: Vec<String>,
    subscriptions: Vec<Subscription>,
}

/// In-memory topic service
///
/// Records published messages and serves subscription fixtures in pages, so
/// the legacy pagination path is exercised for real.
pub struct MemoryTopicService {
    topics: Mutex<HashMap<String, TopicState>>,
    page_size: usize,
    fail_publish: Vec<String>,
}

impl MemoryTopicService {
    /// Create a service with the provider-like page size of 100
    pub fn new() -> Self {
        Self::with_page_size(100)
    }

    /// Create a service with a custom subscription page size
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
            page_size: page_size.max(1),
            fail_publish: Vec::new(),
        }
    }

    /// Make publishes to the named topic fail
    pub fn fail_publish_to(mut self, topic: impl Into<String>) -> Self {
        self.fail_publish.push(topic.into());
        self
    }

    /// Messages published to a topic so far
    pub fn published(&self, name: &str) -> Vec<String> {
        self.topics
            .lock()
            .unwrap()
            .get(name)
            .map(|t| t.published.clone())
            .unwrap_or_default()
    }

    /// Replace a topic's subscription fixture (creates the topic if absent)
    pub fn set_subscriptions(&self, name: &str, subscriptions: Vec<Subscription>) {
        let mut topics = self.topics.lock().unwrap();
        topics.entry(name.to_string()).or_default().subscriptions = subscriptions;
    }
}

impl Default for MemoryTopicService {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicService for MemoryTopicService {
    #[instrument(name = "memory_topic_ensure", skip(self), fields(topic = %name))]
    async fn ensure_topic(&self, name: &str) -> Result<TopicHandle, ContractError> {
        self.topics
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default();
        Ok(TopicHandle {
            name: name.to_string(),
            arn: format!("mem:topic:{name}"),
        })
    }

    async fn publish(&self, topic: &TopicHandle, message: &str) -> Result<(), ContractError> {
        if self.fail_publish.contains(&topic.name) {
            return Err(ContractError::topic_publish(&topic.name, "injected failure"));
        }

        let mut topics = self.topics.lock().unwrap();
        let state = topics
            .get_mut(&topic.name)
            .ok_or_else(|| ContractError::topic_publish(&topic.name, "no such topic"))?;
        state.published.push(message.to_string());
        Ok(())
    }

    async fn list_subscriptions(
        &self,
        topic: &TopicHandle,
        page_token: Option<String>,
    ) -> Result<SubscriptionPage, ContractError> {
        let topics = self.topics.lock().unwrap();
        let state = topics
            .get(&topic.name)
            .ok_or_else(|| ContractError::subscription_list(&topic.name, "no such topic"))?;

        let offset = match page_token {
            Some(token) => token.parse::<usize>().map_err(|_| {
                ContractError::subscription_list(&topic.name, format!("bad page token: {token}"))
            })?,
            None => 0,
        };

        let end = (offset + self.page_size).min(state.subscriptions.len());
        let next_token = (end < state.subscriptions.len()).then(|| end.to_string());
        Ok(SubscriptionPage {
            subscriptions: state.subscriptions[offset..end].to_vec(),
            next_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(id: &str) -> Subscription {
        Subscription {
            arn: format!("mem:sub:topic:{id}"),
            protocol: "sqs".into(),
            endpoint: format!("endpoint-{id}"),
        }
    }

    #[tokio::test]
    async fn test_publish_records_messages() {
        let service = MemoryTopicService::new();
        let topic = service.ensure_topic("out").await.unwrap();
        service.publish(&topic, "first").await.unwrap();
        service.publish(&topic, "second").await.unwrap();
        assert_eq!(service.published("out"), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_list_subscriptions_paginates() {
        let service = MemoryTopicService::with_page_size(2);
        let topic = service.ensure_topic("out").await.unwrap();
        service.set_subscriptions(
            "out",
            vec![subscription("a"), subscription("b"), subscription("c")],
        );

        let first = service.list_subscriptions(&topic, None).await.unwrap();
        assert_eq!(first.subscriptions.len(), 2);
        let token = first.next_token.expect("expected continuation token");

        let second = service
            .list_subscriptions(&topic, Some(token))
            .await
            .unwrap();
        assert_eq!(second.subscriptions.len(), 1);
        assert!(second.next_token.is_none());
    }

    #[tokio::test]
    async fn test_injected_publish_failure() {
        let service = MemoryTopicService::new().fail_publish_to("out");
        let topic = service.ensure_topic("out").await.unwrap();
        assert!(service.publish(&topic, "msg").await.is_err());
    }
}
