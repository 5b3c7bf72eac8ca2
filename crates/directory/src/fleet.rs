//! Fleet-tag directory strategy

use tracing::{debug, instrument};

use contracts::{ContractError, FleetClient, SubscriberId, TagFilter};

use crate::Directory;

/// Directory backed by live fleet discovery.
///
/// Each live resource tagged with the deployment label contributes its stable
/// instance identifier; the archival subscriber is appended last. Zero live
/// resources resolves to the archival subscriber alone.
pub struct FleetDirectory<F> {
    fleet: F,
    filter_tag: String,
    identity_tag: String,
    archival: SubscriberId,
}

impl<F> FleetDirectory<F> {
    /// Create a directory over the given fleet client.
    pub fn new(
        fleet: F,
        filter_tag: impl Into<String>,
        identity_tag: impl Into<String>,
        archival: SubscriberId,
    ) -> Self {
        Self {
            fleet,
            filter_tag: filter_tag.into(),
            identity_tag: identity_tag.into(),
            archival,
        }
    }
}

impl<F: FleetClient + Sync> Directory for FleetDirectory<F> {
    #[instrument(name = "fleet_directory_resolve", skip(self), fields(label = %task_label))]
    async fn resolve(&self, task_label: &str) -> Result<Vec<SubscriberId>, ContractError> {
        let filter = TagFilter::new(
            self.filter_tag.clone(),
            task_label,
            self.identity_tag.clone(),
        );
        let mut subscribers = self.fleet.list_instances(&filter).await?;
        subscribers.push(self.archival.clone());

        debug!(subscribers = subscribers.len(), "Subscriber set resolved");
        Ok(subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backends::StaticFleetClient;

    fn archival() -> SubscriberId {
        SubscriberId::new("persistent-database-writer")
    }

    #[tokio::test]
    async fn test_empty_fleet_resolves_to_archival_only() {
        let directory = FleetDirectory::new(
            StaticFleetClient::new(),
            "fleet:task",
            "fleet:instance",
            archival(),
        );
        let subscribers = directory.resolve("highlands").await.unwrap();
        assert_eq!(subscribers.len(), 1);
        assert_eq!(subscribers[0], "persistent-database-writer");
    }

    #[tokio::test]
    async fn test_archival_appended_last() {
        let fleet = StaticFleetClient::new().with_fleet(
            "highlands",
            vec![SubscriberId::new("i-1"), SubscriberId::new("i-2")],
        );
        let directory = FleetDirectory::new(fleet, "fleet:task", "fleet:instance", archival());
        let subscribers = directory.resolve("highlands").await.unwrap();
        assert_eq!(subscribers.len(), 3);
        assert_eq!(subscribers[0], "i-1");
        assert_eq!(subscribers[1], "i-2");
        assert_eq!(subscribers[2], "persistent-database-writer");
    }

    #[tokio::test]
    async fn test_fleet_error_propagates() {
        let directory = FleetDirectory::new(
            StaticFleetClient::failing(),
            "fleet:task",
            "fleet:instance",
            archival(),
        );
        assert!(directory.resolve("highlands").await.is_err());
    }
}
