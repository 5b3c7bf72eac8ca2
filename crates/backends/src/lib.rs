//! # Backends
//!
//! Concrete implementations of the contracts service traits.
//!
//! - `aws` (feature `aws`, default on): SQS channels, SNS topics, EC2 fleet
//! - `memory`: in-memory fakes with real visibility-timeout and receipt
//!   semantics, used by unit and end-to-end tests

#[cfg(feature = "aws")]
pub mod aws;
pub mod memory;

#[cfg(feature = "aws")]
pub use aws::{AwsChannelService, AwsFleetClient, AwsTopicService};
pub use memory::{FailureInjection, MemoryChannelService, MemoryTopicService, StaticFleetClient};
