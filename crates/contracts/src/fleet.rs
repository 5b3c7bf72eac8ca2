//! FleetClient trait - live compute fleet discovery

use crate::{ContractError, SubscriberId};

/// Tag query for the live fleet of one deployment.
#[derive(Debug, Clone)]
pub struct TagFilter {
    /// Tag key that marks membership in the deployment (e.g. "fleet:task")
    pub filter_tag: String,

    /// Required value of the membership tag (the deployment/task label)
    pub value: String,

    /// Tag key holding each resource's stable instance identifier
    pub identity_tag: String,
}

impl TagFilter {
    /// Build a filter for one deployment label with the given tag keys.
    pub fn new(
        filter_tag: impl Into<String>,
        value: impl Into<String>,
        identity_tag: impl Into<String>,
    ) -> Self {
        Self {
            filter_tag: filter_tag.into(),
            value: value.into(),
            identity_tag: identity_tag.into(),
        }
    }
}

/// Fleet discovery trait
///
/// Queries compute resources tagged as belonging to a deployment and extracts
/// each resource's stable identity tag. Zero live resources is not an error.
#[trait_variant::make(FleetClient: Send)]
pub trait LocalFleetClient {
    /// List the identity tags of live resources matching the filter.
    async fn list_instances(&self, filter: &TagFilter)
        -> Result<Vec<SubscriberId>, ContractError>;
}
