//! Config-driven strategy selection

use contracts::{
    ContractError, DeploymentBlueprint, DirectoryStrategy, FleetClient, SubscriberId, TopicService,
};

use crate::{Directory, FleetDirectory, SubscriptionDirectory};

/// Either directory strategy, selected by blueprint configuration.
///
/// Static dispatch over the two implementations, so the distributor stays
/// generic over one `Directory` bound.
pub enum AnyDirectory<F, T> {
    /// Dynamic fleet discovery
    Fleet(FleetDirectory<F>),
    /// Legacy subscription enumeration
    Subscriptions(SubscriptionDirectory<T>),
}

impl<F, T> AnyDirectory<F, T> {
    /// Build the configured strategy from a deployment blueprint.
    ///
    /// Both clients are taken up front; the unselected one is dropped.
    pub fn from_blueprint(blueprint: &DeploymentBlueprint, fleet: F, topics: T) -> Self {
        match blueprint.directory.strategy {
            DirectoryStrategy::Fleet => Self::Fleet(FleetDirectory::new(
                fleet,
                blueprint.directory.filter_tag.clone(),
                blueprint.directory.identity_tag.clone(),
                blueprint.archival.subscriber.clone(),
            )),
            DirectoryStrategy::Subscriptions => Self::Subscriptions(SubscriptionDirectory::new(
                topics,
                blueprint.archival.subscriber.clone(),
            )),
        }
    }
}

impl<F, T> Directory for AnyDirectory<F, T>
where
    F: FleetClient + Sync,
    T: TopicService + Sync,
{
    async fn resolve(&self, task_label: &str) -> Result<Vec<SubscriberId>, ContractError> {
        match self {
            Self::Fleet(directory) => directory.resolve(task_label).await,
            Self::Subscriptions(directory) => directory.resolve(task_label).await,
        }
    }
}
