//! Static fleet client for tests

use std::collections::HashMap;
use std::sync::Mutex;

use contracts::{ContractError, FleetClient, SubscriberId, TagFilter};

/// Fleet client backed by a fixed label -> instances map.
pub struct StaticFleetClient {
    fleets: Mutex<HashMap<String, Vec<SubscriberId>>>,
    fail: bool,
}

impl StaticFleetClient {
    /// Create an empty fleet (every query resolves to zero instances)
    pub fn new() -> Self {
        Self {
            fleets: Mutex::new(HashMap::new()),
            fail: false,
        }
    }

    /// Create a client whose queries fail
    pub fn failing() -> Self {
        Self {
            fleets: Mutex::new(HashMap::new()),
            fail: true,
        }
    }

    /// Register the live instances for a deployment label
    pub fn with_fleet(self, label: impl Into<String>, instances: Vec<SubscriberId>) -> Self {
        self.fleets.lock().unwrap().insert(label.into(), instances);
        self
    }
}

impl Default for StaticFleetClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FleetClient for StaticFleetClient {
    async fn list_instances(
        &self,
        filter: &TagFilter,
    ) -> Result<Vec<SubscriberId>, ContractError> {
        if self.fail {
            return Err(ContractError::fleet_query("injected failure"));
        }
        Ok(self
            .fleets
            .lock()
            .unwrap()
            .get(&filter.value)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_label_resolves_empty() {
        let client = StaticFleetClient::new();
        let filter = TagFilter::new("fleet:task", "unknown", "fleet:instance");
        assert!(client.list_instances(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_registered_fleet_is_returned() {
        let client = StaticFleetClient::new().with_fleet(
            "highlands",
            vec![SubscriberId::new("i-1"), SubscriberId::new("i-2")],
        );
        let filter = TagFilter::new("fleet:task", "highlands", "fleet:instance");
        let instances = client.list_instances(&filter).await.unwrap();
        assert_eq!(instances.len(), 2);
    }
}
