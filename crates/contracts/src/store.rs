//! RowStore trait - archival sink storage seam

use crate::ContractError;

/// Row storage trait
///
/// The archiver upserts one JSON row per entry, keyed by the submission's
/// instance id, so redelivered entries overwrite instead of duplicating.
#[trait_variant::make(RowStore: Send)]
pub trait LocalRowStore {
    /// Insert or update one row.
    async fn upsert(
        &self,
        table: &str,
        key: &str,
        row: &serde_json::Value,
    ) -> Result<(), ContractError>;
}

// Delegation so one store instance can be shared across components
impl<S: RowStore + Sync> RowStore for std::sync::Arc<S> {
    async fn upsert(
        &self,
        table: &str,
        key: &str,
        row: &serde_json::Value,
    ) -> Result<(), ContractError> {
        (**self).upsert(table, key, row).await
    }
}
