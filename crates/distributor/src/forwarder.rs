//! Fan-out forwarder - copies entry bodies into destination channels

use tracing::{debug, instrument};

use contracts::{ChannelName, ChannelService, ContractError, Entry};
use observability::record_entry_forwarded;

/// Copies entries verbatim into destination channels.
///
/// Send-only: the destination never acknowledges back. Re-sending an
/// identical copy after a partial-failure retry is harmless because every
/// downstream consumer is an at-least-once consumer.
pub struct Forwarder<'a, C> {
    channels: &'a C,
}

impl<'a, C: ChannelService + Sync> Forwarder<'a, C> {
    /// Create a forwarder over the given channel service.
    pub fn new(channels: &'a C) -> Self {
        Self { channels }
    }

    /// Copy the entry's body into the destination channel.
    #[instrument(
        name = "forwarder_forward",
        skip(self, entry),
        fields(message_id = %entry.message_id, destination = %destination)
    )]
    pub async fn forward(
        &self,
        entry: &Entry,
        destination: &ChannelName,
    ) -> Result<(), ContractError> {
        self.channels.send(destination, entry.body.clone()).await?;
        record_entry_forwarded(destination.as_str());
        debug!("Entry copy forwarded");
        Ok(())
    }
}
