//! In-memory service fakes
//!
//! Faithful enough for the delivery semantics the core depends on: idempotent
//! create, visibility-timeout redelivery with fresh receipt tokens, idempotent
//! delete, paginated subscription listing. Failure scenarios are injectable.

mod channel;
mod fleet;
mod topic;

pub use channel::{FailureInjection, MemoryChannelService};
pub use fleet::StaticFleetClient;
pub use topic::MemoryTopicService;
