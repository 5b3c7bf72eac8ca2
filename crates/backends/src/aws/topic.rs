//! SNS-backed topic service

use aws_sdk_sns::Client;
use tracing::instrument;

use contracts::{ContractError, Subscription, SubscriptionPage, TopicHandle, TopicService};

/// Topic service over SNS topics.
#[derive(Clone)]
pub struct AwsTopicService {
    client: Client,
}

impl AwsTopicService {
    /// Wrap an existing SNS client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Construct from the ambient AWS configuration
    pub async fn from_env() -> Self {
        Self::new(Client::new(&super::shared_config().await))
    }
}

impl TopicService for AwsTopicService {
    #[instrument(name = "sns_ensure_topic", skip(self), fields(topic = %name))]
    async fn ensure_topic(&self, name: &str) -> Result<TopicHandle, ContractError> {
        let out = self
            .client
            .create_topic()
            .name(name)
            .send()
            .await
            .map_err(|e| ContractError::topic_create(name, e.to_string()))?;
        let arn = out
            .topic_arn()
            .ok_or_else(|| ContractError::topic_create(name, "response missing topic arn"))?;
        Ok(TopicHandle {
            name: name.to_string(),
            arn: arn.to_string(),
        })
    }

    #[instrument(name = "sns_publish", skip(self, message), fields(topic = %topic.name))]
    async fn publish(&self, topic: &TopicHandle, message: &str) -> Result<(), ContractError> {
        self.client
            .publish()
            .topic_arn(&topic.arn)
            .message(message)
            .send()
            .await
            .map_err(|e| ContractError::topic_publish(&topic.name, e.to_string()))?;
        Ok(())
    }

    #[instrument(name = "sns_list_subscriptions", skip(self, page_token), fields(topic = %topic.name))]
    async fn list_subscriptions(
        &self,
        topic: &TopicHandle,
        page_token: Option<String>,
    ) -> Result<SubscriptionPage, ContractError> {
        let out = self
            .client
            .list_subscriptions_by_topic()
            .topic_arn(&topic.arn)
            .set_next_token(page_token)
            .send()
            .await
            .map_err(|e| ContractError::subscription_list(&topic.name, e.to_string()))?;

        let subscriptions = out
            .subscriptions()
            .iter()
            .filter_map(|s| {
                let arn = s.subscription_arn()?;
                Some(Subscription {
                    arn: arn.to_string(),
                    protocol: s.protocol().unwrap_or_default().to_string(),
                    endpoint: s.endpoint().unwrap_or_default().to_string(),
                })
            })
            .collect();

        Ok(SubscriptionPage {
            subscriptions,
            next_token: out.next_token().map(str::to_string),
        })
    }
}
