//! Channel provisioner - idempotent create-or-get with per-run caching

use std::collections::HashMap;

use tracing::debug;

use contracts::{ChannelHandle, ChannelName, ChannelService, ContractError};

/// Provisions derived channels on demand.
///
/// `ensure` is idempotent at the provider (two invocations racing to create
/// the same channel both succeed); the cache only saves repeat calls within
/// one run, it is not a correctness mechanism.
pub struct Provisioner<'a, C> {
    channels: &'a C,
    ensured: HashMap<ChannelName, ChannelHandle>,
}

impl<'a, C: ChannelService + Sync> Provisioner<'a, C> {
    /// Create a provisioner over the given channel service.
    pub fn new(channels: &'a C) -> Self {
        Self {
            channels,
            ensured: HashMap::new(),
        }
    }

    /// Create the channel if absent, returning its handle.
    pub async fn ensure(&mut self, name: &ChannelName) -> Result<ChannelHandle, ContractError> {
        if let Some(handle) = self.ensured.get(name) {
            return Ok(handle.clone());
        }

        let handle = self.channels.ensure(name).await?;
        debug!(channel = %name, "Destination channel provisioned");
        self.ensured.insert(name.clone(), handle.clone());
        Ok(handle)
    }

    /// Number of distinct channels ensured so far in this run
    pub fn ensured_count(&self) -> usize {
        self.ensured.len()
    }
}
