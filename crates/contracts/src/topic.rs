//! TopicService trait - publish/subscribe destination interface

use crate::ContractError;

/// Handle to an existing topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicHandle {
    /// Topic name (identity)
    pub name: String,

    /// Provider resource identifier (ARN-like)
    pub arn: String,
}

/// One subscription attached to a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// Provider subscription identifier; the trailing segment is the
    /// subscriber id used for channel derivation
    pub arn: String,

    /// Delivery protocol (diagnostics only)
    pub protocol: String,

    /// Delivery endpoint (diagnostics only)
    pub endpoint: String,
}

impl Subscription {
    /// Subscriber id: the segment after the last `:` of the subscription arn.
    pub fn subscriber_id(&self) -> &str {
        self.arn.rsplit(':').next().unwrap_or(&self.arn)
    }
}

/// One page of a subscription listing.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionPage {
    /// Subscriptions on this page
    pub subscriptions: Vec<Subscription>,

    /// Continuation token; absent on the last page
    pub next_token: Option<String>,
}

/// Topic service trait
///
/// Thin capability over a managed publish/subscribe topic.
#[trait_variant::make(TopicService: Send)]
pub trait LocalTopicService {
    /// Create the topic if absent, returning its handle.
    async fn ensure_topic(&self, name: &str) -> Result<TopicHandle, ContractError>;

    /// Publish a message to the topic.
    async fn publish(&self, topic: &TopicHandle, message: &str) -> Result<(), ContractError>;

    /// List one page of current subscriptions (legacy enumeration).
    ///
    /// Callers follow `next_token` until absent, concatenating pages.
    async fn list_subscriptions(
        &self,
        topic: &TopicHandle,
        page_token: Option<String>,
    ) -> Result<SubscriptionPage, ContractError>;
}

// Delegation so one service instance can be shared across components
impl<S: TopicService + Sync> TopicService for std::sync::Arc<S> {
    async fn ensure_topic(&self, name: &str) -> Result<TopicHandle, ContractError> {
        (**self).ensure_topic(name).await
    }

    async fn publish(&self, topic: &TopicHandle, message: &str) -> Result<(), ContractError> {
        (**self).publish(topic, message).await
    }

    async fn list_subscriptions(
        &self,
        topic: &TopicHandle,
        page_token: Option<String>,
    ) -> Result<SubscriptionPage, ContractError> {
        (**self).list_subscriptions(topic, page_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_id_is_arn_suffix() {
        let sub = Subscription {
            arn: "arn:aws:sns:eu-west-1:123:topic:0a314486-a412".into(),
            protocol: "sqs".into(),
            endpoint: "writer".into(),
        };
        assert_eq!(sub.subscriber_id(), "0a314486-a412");
    }

    #[test]
    fn test_subscriber_id_without_separator() {
        let sub = Subscription {
            arn: "bare-id".into(),
            protocol: "sqs".into(),
            endpoint: "writer".into(),
        };
        assert_eq!(sub.subscriber_id(), "bare-id");
    }
}
