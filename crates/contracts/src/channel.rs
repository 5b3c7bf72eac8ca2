//! ChannelService trait - durable point-to-point mailbox interface
//!
//! Create-if-absent, receive-with-visibility-timeout, send, delete-by-receipt.

use bytes::Bytes;

use crate::{ChannelName, ContractError, Entry, ReceiptToken};

/// Tuning for a single receive call.
#[derive(Debug, Clone, Copy)]
pub struct ReceiveOptions {
    /// Upper bound on entries returned (provider max is 10)
    pub max_entries: usize,

    /// Seconds an in-flight entry stays invisible before redelivery
    pub visibility_timeout_secs: u32,

    /// Long-poll wait in seconds (0 = return immediately)
    pub wait_time_secs: u32,
}

impl Default for ReceiveOptions {
    fn default() -> Self {
        Self {
            max_entries: 10,
            visibility_timeout_secs: 30,
            wait_time_secs: 1,
        }
    }
}

/// Handle to an existing channel.
///
/// `ensure` on a pre-existing channel returns an equivalent handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    /// Channel name (identity)
    pub name: ChannelName,

    /// Provider endpoint for the channel
    pub url: String,
}

/// Channel service trait
///
/// Thin capability over a managed queue. All implementations must keep
/// `ensure` idempotent and `delete` a no-op for unknown or stale receipts;
/// the fan-out core relies on both for crash-retry safety.
#[trait_variant::make(ChannelService: Send)]
pub trait LocalChannelService {
    /// Create the channel if absent, returning its handle.
    ///
    /// Never errors because the channel already exists. Safe to call from
    /// concurrent invocations racing to create the same name.
    async fn ensure(&self, name: &ChannelName) -> Result<ChannelHandle, ContractError>;

    /// Receive up to `opts.max_entries` entries.
    ///
    /// Received entries become invisible for `opts.visibility_timeout_secs`
    /// and are redelivered with fresh receipt tokens if not deleted in time.
    async fn receive(
        &self,
        name: &ChannelName,
        opts: ReceiveOptions,
    ) -> Result<Vec<Entry>, ContractError>;

    /// Append a body to the channel (send-only; no acknowledgment back).
    async fn send(&self, name: &ChannelName, body: Bytes) -> Result<(), ContractError>;

    /// Delete an entry by receipt token.
    ///
    /// Idempotent: deleting an already-deleted or expired receipt succeeds.
    async fn delete(&self, name: &ChannelName, receipt: &ReceiptToken)
        -> Result<(), ContractError>;
}

// Delegation so one service instance can be shared across components
impl<S: ChannelService + Sync> ChannelService for std::sync::Arc<S> {
    async fn ensure(&self, name: &ChannelName) -> Result<ChannelHandle, ContractError> {
        (**self).ensure(name).await
    }

    async fn receive(
        &self,
        name: &ChannelName,
        opts: ReceiveOptions,
    ) -> Result<Vec<Entry>, ContractError> {
        (**self).receive(name, opts).await
    }

    async fn send(&self, name: &ChannelName, body: Bytes) -> Result<(), ContractError> {
        (**self).send(name, body).await
    }

    async fn delete(
        &self,
        name: &ChannelName,
        receipt: &ReceiptToken,
    ) -> Result<(), ContractError> {
        (**self).delete(name, receipt).await
    }
}
