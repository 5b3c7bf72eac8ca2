//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-crate data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Delivery Model
//! - Entries are consumed at-least-once; a receipt token identifies one delivery attempt
//! - Channel existence is idempotent; derived channel names are injective per subscriber

mod blueprint;
mod channel;
mod control;
mod entry;
mod error;
mod fleet;
mod name;
mod store;
mod topic;

pub use blueprint::*;
pub use channel::*;
pub use control::*;
pub use entry::*;
pub use error::*;
pub use fleet::*;
pub use name::{ChannelName, SubscriberId};
pub use store::*;
pub use topic::*;
