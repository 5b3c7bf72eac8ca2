//! SQS-backed channel service

use aws_sdk_sqs::Client;
use bytes::Bytes;
use tracing::instrument;

use contracts::{
    ChannelHandle, ChannelName, ChannelService, ContractError, Entry, ReceiptToken, ReceiveOptions,
};

/// Channel service over SQS queues.
///
/// Queue identity is the queue name; `ensure` maps to the provider's
/// idempotent `CreateQueue`.
#[derive(Clone)]
pub struct AwsChannelService {
    client: Client,
}

impl AwsChannelService {
    /// Wrap an existing SQS client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Construct from the ambient AWS configuration
    pub async fn from_env() -> Self {
        Self::new(Client::new(&super::shared_config().await))
    }

    async fn queue_url(&self, name: &ChannelName) -> Result<String, String> {
        let out = self
            .client
            .get_queue_url()
            .queue_name(name.as_str())
            .send()
            .await
            .map_err(|e| e.to_string())?;
        out.queue_url()
            .map(str::to_string)
            .ok_or_else(|| "response missing queue url".to_string())
    }
}

impl ChannelService for AwsChannelService {
    #[instrument(name = "sqs_ensure", skip(self), fields(channel = %name))]
    async fn ensure(&self, name: &ChannelName) -> Result<ChannelHandle, ContractError> {
        let out = self
            .client
            .create_queue()
            .queue_name(name.as_str())
            .send()
            .await
            .map_err(|e| ContractError::channel_create(name.as_str(), e.to_string()))?;
        let url = out
            .queue_url()
            .ok_or_else(|| ContractError::channel_create(name.as_str(), "response missing queue url"))?;
        Ok(ChannelHandle {
            name: name.clone(),
            url: url.to_string(),
        })
    }

    #[instrument(
        name = "sqs_receive",
        skip(self, opts),
        fields(channel = %name, max = opts.max_entries)
    )]
    async fn receive(
        &self,
        name: &ChannelName,
        opts: ReceiveOptions,
    ) -> Result<Vec<Entry>, ContractError> {
        let url = self
            .queue_url(name)
            .await
            .map_err(|e| ContractError::channel_receive(name.as_str(), e))?;

        let out = self
            .client
            .receive_message()
            .queue_url(&url)
            .max_number_of_messages(opts.max_entries.min(10) as i32)
            .visibility_timeout(opts.visibility_timeout_secs as i32)
            .wait_time_seconds(opts.wait_time_secs as i32)
            .send()
            .await
            .map_err(|e| ContractError::channel_receive(name.as_str(), e.to_string()))?;

        let mut entries = Vec::new();
        for msg in out.messages() {
            // A message without a receipt handle cannot be acknowledged; skip it
            let Some(receipt) = msg.receipt_handle() else {
                continue;
            };
            entries.push(Entry {
                message_id: msg.message_id().unwrap_or_default().to_string(),
                receipt: ReceiptToken::new(receipt),
                body: Bytes::from(msg.body().unwrap_or_default().to_string()),
                channel: name.clone(),
            });
        }
        Ok(entries)
    }

    #[instrument(name = "sqs_send", skip(self, body), fields(channel = %name, bytes = body.len()))]
    async fn send(&self, name: &ChannelName, body: Bytes) -> Result<(), ContractError> {
        let url = self
            .queue_url(name)
            .await
            .map_err(|e| ContractError::channel_send(name.as_str(), e))?;

        self.client
            .send_message()
            .queue_url(&url)
            .message_body(String::from_utf8_lossy(&body).into_owned())
            .send()
            .await
            .map_err(|e| ContractError::channel_send(name.as_str(), e.to_string()))?;
        Ok(())
    }

    #[instrument(name = "sqs_delete", skip(self, receipt), fields(channel = %name))]
    async fn delete(
        &self,
        name: &ChannelName,
        receipt: &ReceiptToken,
    ) -> Result<(), ContractError> {
        let url = self
            .queue_url(name)
            .await
            .map_err(|e| ContractError::channel_delete(name.as_str(), e))?;

        self.client
            .delete_message()
            .queue_url(&url)
            .receipt_handle(receipt.as_str())
            .send()
            .await
            .map_err(|e| ContractError::channel_delete(name.as_str(), e.to_string()))?;
        Ok(())
    }
}
