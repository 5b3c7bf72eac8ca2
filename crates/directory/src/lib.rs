//! # Directory
//!
//! Subscriber resolution: who should receive a copy of every entry right now.
//!
//! Two strategies behind one trait, selected by configuration. The system
//! evolved from static subscription enumeration to dynamic fleet discovery,
//! so both remain supported:
//! - [`FleetDirectory`]: query live compute resources by deployment tag
//! - [`SubscriptionDirectory`]: legacy paginated topic-subscription listing
//!
//! Every strategy appends the fixed archival subscriber last, and resolving
//! an empty fleet is not an error.

mod fleet;
mod select;
mod subscriptions;

pub use fleet::FleetDirectory;
pub use select::AnyDirectory;
pub use subscriptions::SubscriptionDirectory;

use contracts::{ContractError, SubscriberId};

/// Subscriber directory trait
///
/// `resolve` returns the ordered subscriber set for one deployment label.
/// The archival subscriber is always present and always last.
#[trait_variant::make(Directory: Send)]
pub trait LocalDirectory {
    /// Resolve the current subscriber set for a deployment/task label.
    async fn resolve(&self, task_label: &str) -> Result<Vec<SubscriberId>, ContractError>;
}
