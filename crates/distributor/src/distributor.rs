//! Fan-out distributor - one invocation of the replication core
//!
//! Per-entry lifecycle: Pending (read, untouched) -> PartiallyForwarded (some
//! copies sent; only observable mid-crash) -> FullyForwarded (every subscriber
//! has a copy, notification published) -> Acknowledged (deleted from the
//! incoming channel). Nothing is persisted between transitions: recovery is
//! "redo the whole fan-out" via visibility-timeout redelivery, and duplicate
//! copies downstream are the accepted trade-off.

use std::time::Instant;

use tracing::{info, instrument, warn};

use contracts::{
    outgoing_topic_name, ChannelName, ChannelService, ControlMessage, DeploymentBlueprint, Entry,
    MalformedEntryPolicy, Notification, ReceiveOptions, SubscriberId, TopicService,
};
use directory::Directory;
use observability::{record_batch_received, record_entry_acknowledged, record_fanout_latency_ms};

use crate::error::DistributorError;
use crate::forwarder::Forwarder;
use crate::metrics::{DeliveryMetrics, DeliverySnapshot};
use crate::notifier::Notifier;
use crate::provisioner::Provisioner;

/// Distributor configuration
#[derive(Debug, Clone)]
pub struct DistributorConfig {
    /// Deployment/task label the subscriber set is resolved for
    pub deployment: String,

    /// Fixed archival subscriber (persistence sink)
    pub archival: SubscriberId,

    /// Entries read per invocation, 1..=10
    pub batch_size: usize,

    /// Visibility timeout for received entries (seconds)
    pub visibility_timeout_secs: u32,

    /// Long-poll wait per receive call (seconds)
    pub wait_time_secs: u32,

    /// Malformed-entry handling
    pub malformed: MalformedEntryPolicy,
}

impl DistributorConfig {
    /// Build the distributor configuration from a deployment blueprint.
    pub fn from_blueprint(blueprint: &DeploymentBlueprint) -> Self {
        Self {
            deployment: blueprint.deployment.label.clone(),
            archival: blueprint.archival.subscriber.clone(),
            batch_size: blueprint.channels.batch_size,
            visibility_timeout_secs: blueprint.channels.visibility_timeout_secs,
            wait_time_secs: blueprint.channels.wait_time_secs,
            malformed: blueprint.policy.malformed,
        }
    }

    fn receive_options(&self) -> ReceiveOptions {
        ReceiveOptions {
            max_entries: self.batch_size,
            visibility_timeout_secs: self.visibility_timeout_secs,
            wait_time_secs: self.wait_time_secs,
        }
    }
}

/// Outcome of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Entries fully processed (forwarded, notified, acknowledged)
    pub processed: usize,

    /// Cooperative re-invocation signal: true iff the batch came back full,
    /// so the incoming channel probably holds more work
    pub call_again: bool,
}

/// Parse the raw control message carried by the triggering event.
pub fn parse_control(raw: &str) -> Result<ControlMessage, DistributorError> {
    serde_json::from_str(raw).map_err(|e| DistributorError::control_parse(e.to_string()))
}

/// The fan-out distributor.
///
/// Holds injected service clients; stateless across invocations. Concurrent
/// invocations over the same entry are tolerated: forwarding duplicates is
/// harmless downstream and delete-by-receipt is idempotent.
pub struct Distributor<C, T, D> {
    channels: C,
    topics: T,
    directory: D,
    config: DistributorConfig,
    metrics: DeliveryMetrics,
}

impl<C, T, D> Distributor<C, T, D>
where
    C: ChannelService + Sync,
    T: TopicService + Sync,
    D: Directory + Sync,
{
    /// Create a distributor with injected clients.
    pub fn new(channels: C, topics: T, directory: D, config: DistributorConfig) -> Self {
        Self {
            channels,
            topics,
            directory,
            config,
            metrics: DeliveryMetrics::new(),
        }
    }

    /// Get a snapshot of the delivery counters.
    pub fn metrics(&self) -> DeliverySnapshot {
        self.metrics.snapshot()
    }

    /// Run one bounded invocation against the control message's channel pair.
    ///
    /// Returns the cooperative re-invocation signal; errors leave the current
    /// entry (and the rest of the batch) unacknowledged for redelivery.
    #[instrument(name = "distributor_run", skip(self, control), fields(queue = %control.queue))]
    pub async fn run(&self, control: &ControlMessage) -> Result<RunOutcome, DistributorError> {
        let subscribers = self.directory.resolve(&self.config.deployment).await?;
        info!(subscribers = subscribers.len(), "Subscriber set resolved");

        let batch = self
            .channels
            .receive(&control.queue, self.config.receive_options())
            .await?;
        let batch_len = batch.len();
        self.metrics.inc_batch_count();
        record_batch_received(batch_len);

        let mut provisioner = Provisioner::new(&self.channels);
        let forwarder = Forwarder::new(&self.channels);
        let mut notifier = Notifier::new(
            &self.topics,
            outgoing_topic_name(&self.config.deployment),
        );

        let mut processed = 0usize;
        for entry in &batch {
            if !self.admit(entry, control).await? {
                continue;
            }
            let started = Instant::now();

            // Pending -> PartiallyForwarded -> FullyForwarded
            for subscriber in &subscribers {
                let destination = control.queue.derived(subscriber);
                provisioner.ensure(&destination).await?;
                forwarder.forward(entry, &destination).await?;
                self.metrics.inc_forwarded_count();
            }

            let (queue, dead_letter_queue) = control.derived_pair(&self.config.archival);
            notifier
                .notify(&Notification {
                    queue,
                    dead_letter_queue,
                })
                .await?;
            self.metrics.inc_notified_count();

            // FullyForwarded -> Acknowledged
            self.acknowledge(&control.queue, entry).await?;
            record_fanout_latency_ms(started.elapsed().as_secs_f64() * 1000.0);
            processed += 1;
        }

        let call_again = batch_len > 0 && batch_len >= self.config.batch_size;
        info!(processed, call_again, "Distribution run complete");
        Ok(RunOutcome {
            processed,
            call_again,
        })
    }

    /// Delete the entry from the incoming channel by its receipt token.
    ///
    /// Runs strictly after all forwarding and the notification; never running
    /// it is safe because the visibility timeout redelivers, and running it
    /// twice is safe because delete-by-receipt is idempotent.
    async fn acknowledge(
        &self,
        channel: &ChannelName,
        entry: &Entry,
    ) -> Result<(), DistributorError> {
        self.channels.delete(channel, &entry.receipt).await?;
        self.metrics.inc_acknowledged_count();
        record_entry_acknowledged();
        Ok(())
    }

    /// Apply the malformed-entry policy. Returns whether to fan the entry out.
    async fn admit(
        &self,
        entry: &Entry,
        control: &ControlMessage,
    ) -> Result<bool, DistributorError> {
        // The distributor is payload-agnostic under the default policy
        if self.config.malformed == MalformedEntryPolicy::Forward {
            return Ok(true);
        }
        if serde_json::from_slice::<serde_json::Value>(&entry.body).is_ok() {
            return Ok(true);
        }

        match self.config.malformed {
            MalformedEntryPolicy::DropAndAcknowledge => {
                warn!(message_id = %entry.message_id, "Malformed entry dropped");
                self.channels.delete(&control.queue, &entry.receipt).await?;
                self.metrics.inc_dropped_count();
                Ok(false)
            }
            _ => {
                warn!(message_id = %entry.message_id, "Malformed entry left for redelivery");
                Ok(false)
            }
        }
    }
}
