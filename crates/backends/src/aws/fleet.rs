//! EC2-backed fleet discovery

use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client;
use tracing::{debug, instrument};

use contracts::{ContractError, FleetClient, SubscriberId, TagFilter};

/// Fleet client over EC2 instance tags.
///
/// Lists instances carrying `tag:<filter_tag> == label` and extracts the
/// value of each instance's identity tag.
#[derive(Clone)]
pub struct AwsFleetClient {
    client: Client,
}

impl AwsFleetClient {
    /// Wrap an existing EC2 client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Construct from the ambient AWS configuration
    pub async fn from_env() -> Self {
        Self::new(Client::new(&super::shared_config().await))
    }
}

impl FleetClient for AwsFleetClient {
    #[instrument(
        name = "ec2_list_instances",
        skip(self, filter),
        fields(tag = %filter.filter_tag, value = %filter.value)
    )]
    async fn list_instances(
        &self,
        filter: &TagFilter,
    ) -> Result<Vec<SubscriberId>, ContractError> {
        let out = self
            .client
            .describe_instances()
            .filters(
                Filter::builder()
                    .name(format!("tag:{}", filter.filter_tag))
                    .values(&filter.value)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| ContractError::fleet_query(e.to_string()))?;

        let mut instances = Vec::new();
        for reservation in out.reservations() {
            for instance in reservation.instances() {
                for tag in instance.tags() {
                    if tag.key() == Some(filter.identity_tag.as_str()) {
                        if let Some(value) = tag.value() {
                            instances.push(SubscriberId::new(value));
                        }
                    }
                }
            }
        }

        debug!(count = instances.len(), "Live fleet resolved");
        Ok(instances)
    }
}
