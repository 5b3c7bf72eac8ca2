//! # Distributor
//!
//! The fan-out core: read a batch from the incoming channel, resolve the
//! current subscriber set, copy every entry into every subscriber's derived
//! channel, publish one completion notification per entry, then acknowledge.
//!
//! Stateless across invocations by design: nothing is persisted between the
//! per-entry transitions, so crash recovery is "redo the whole fan-out" via
//! the channel service's visibility-timeout redelivery. At-least-once, never
//! exactly-once.

mod distributor;
mod error;
mod forwarder;
mod metrics;
mod notifier;
mod provisioner;

pub use distributor::{parse_control, Distributor, DistributorConfig, RunOutcome};
pub use error::DistributorError;
pub use forwarder::Forwarder;
pub use metrics::{DeliveryMetrics, DeliverySnapshot};
pub use notifier::Notifier;
pub use provisioner::Provisioner;
