//! AWS-managed service clients
//!
//! SQS channels, SNS topics, EC2 fleet discovery. Clients are cheap to clone
//! and constructed once per process from the ambient AWS configuration, then
//! passed into the pipeline explicitly.

mod channel;
mod fleet;
mod topic;

pub use channel::AwsChannelService;
pub use fleet::AwsFleetClient;
pub use topic::AwsTopicService;

use aws_config::BehaviorVersion;

/// Load the shared AWS configuration from the environment.
pub async fn shared_config() -> aws_config::SdkConfig {
    aws_config::load_defaults(BehaviorVersion::latest()).await
}
