//! # Archiver
//!
//! The persistence sink: drains its own derived channel independently of the
//! distributor and upserts each form upload into a row store, keyed by the
//! submission's instance id so redelivered duplicates overwrite instead of
//! multiplying. One more subscriber from the distributor's point of view.

mod archiver;
mod error;
mod store;
mod upload;

pub use archiver::{ArchiveOutcome, Archiver, ArchiverConfig};
pub use error::ArchiverError;
pub use store::MemoryRowStore;
pub use upload::FormUpload;
