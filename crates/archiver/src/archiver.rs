//! Archival sink worker - one invocation of the channel drain
//!
//! Accumulates short receive polls until the configured maximum or an empty
//! poll, stores each upload, then acknowledges. An entry is acknowledged only
//! after its row is stored, so a crash mid-batch redelivers the remainder.

use tracing::{info, instrument, warn};

use contracts::{
    ChannelName, ChannelService, DeploymentBlueprint, Entry, MalformedEntryPolicy, ReceiveOptions,
    RowStore,
};
use observability::record_row_stored;

use crate::error::ArchiverError;
use crate::upload::FormUpload;

/// Archiver configuration
#[derive(Debug, Clone)]
pub struct ArchiverConfig {
    /// The derived channel this sink drains
    pub queue: ChannelName,

    /// Entries accumulated per invocation before signaling "call again"
    pub max_messages: usize,

    /// Visibility timeout for received entries (seconds)
    pub visibility_timeout_secs: u32,

    /// Long-poll wait per receive call (seconds)
    pub wait_time_secs: u32,

    /// Handling of entries that are not form uploads. `Forward` has nothing
    /// to forward here and behaves like `LeaveForRedelivery`.
    pub malformed: MalformedEntryPolicy,
}

impl ArchiverConfig {
    /// Build the archiver configuration from a deployment blueprint.
    ///
    /// The drained channel is the incoming channel's derivation for the
    /// archival subscriber.
    pub fn from_blueprint(blueprint: &DeploymentBlueprint) -> Self {
        Self {
            queue: blueprint
                .channels
                .incoming
                .derived(&blueprint.archival.subscriber),
            max_messages: 10,
            visibility_timeout_secs: blueprint.channels.visibility_timeout_secs,
            wait_time_secs: blueprint.channels.wait_time_secs,
            malformed: blueprint.policy.malformed,
        }
    }

    fn receive_options(&self, remaining: usize) -> ReceiveOptions {
        ReceiveOptions {
            max_entries: remaining.min(10),
            visibility_timeout_secs: self.visibility_timeout_secs,
            wait_time_secs: self.wait_time_secs,
        }
    }
}

/// Outcome of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOutcome {
    /// Rows stored and acknowledged
    pub stored: usize,

    /// Cooperative re-invocation signal: true iff the accumulated batch hit
    /// the configured maximum
    pub call_again: bool,
}

/// The archival sink worker.
pub struct Archiver<C, S> {
    channels: C,
    store: S,
    config: ArchiverConfig,
}

impl<C, S> Archiver<C, S>
where
    C: ChannelService + Sync,
    S: RowStore + Sync,
{
    /// Create an archiver with injected clients.
    pub fn new(channels: C, store: S, config: ArchiverConfig) -> Self {
        Self {
            channels,
            store,
            config,
        }
    }

    /// Drain one bounded batch from the derived channel into the row store.
    #[instrument(name = "archiver_run", skip(self), fields(queue = %self.config.queue))]
    pub async fn run(&self) -> Result<ArchiveOutcome, ArchiverError> {
        let entries = self.accumulate().await?;
        if entries.is_empty() {
            return Ok(ArchiveOutcome {
                stored: 0,
                call_again: false,
            });
        }
        let call_again = entries.len() >= self.config.max_messages;

        let mut stored = 0usize;
        for entry in &entries {
            if self.archive_entry(entry).await? {
                stored += 1;
            }
        }

        info!(stored, call_again, "Archive run complete");
        Ok(ArchiveOutcome { stored, call_again })
    }

    /// Accumulate short polls until the maximum or an empty poll.
    async fn accumulate(&self) -> Result<Vec<Entry>, ArchiverError> {
        let mut entries = Vec::new();
        while entries.len() < self.config.max_messages {
            let remaining = self.config.max_messages - entries.len();
            let more = self
                .channels
                .receive(&self.config.queue, self.config.receive_options(remaining))
                .await?;
            if more.is_empty() {
                break;
            }
            entries.extend(more);
        }
        Ok(entries)
    }

    /// Store one entry's upload and acknowledge it. Returns whether a row was
    /// written.
    async fn archive_entry(&self, entry: &Entry) -> Result<bool, ArchiverError> {
        let upload = match FormUpload::parse(&entry.body) {
            Ok(upload) => upload,
            Err(e) => return self.reject_entry(entry, e).await,
        };

        let key = match upload.instance_id() {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };
        self.store
            .upsert(&upload.form_id, &key, &upload.data)
            .await?;
        record_row_stored(&upload.form_id);

        // Row is durable; now the entry may go
        self.channels
            .delete(&self.config.queue, &entry.receipt)
            .await?;
        Ok(true)
    }

    async fn reject_entry(&self, entry: &Entry, error: ArchiverError) -> Result<bool, ArchiverError> {
        match self.config.malformed {
            MalformedEntryPolicy::DropAndAcknowledge => {
                warn!(message_id = %entry.message_id, %error, "Malformed upload dropped");
                self.channels
                    .delete(&self.config.queue, &entry.receipt)
                    .await?;
                Ok(false)
            }
            _ => {
                warn!(message_id = %entry.message_id, %error, "Malformed upload left for redelivery");
                Ok(false)
            }
        }
    }
}
