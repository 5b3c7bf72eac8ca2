//! In-memory row store

use std::collections::HashMap;
use std::sync::Mutex;

use contracts::{ContractError, RowStore};

/// Row store backed by a table -> key -> row map.
///
/// Stands in for the relational sink in tests and local runs; the upsert
/// semantics match the production store (last write per key wins).
pub struct MemoryRowStore {
    tables: Mutex<HashMap<String, HashMap<String, serde_json::Value>>>,
    fail: bool,
}

impl MemoryRowStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            fail: false,
        }
    }

    /// Create a store whose writes fail
    pub fn failing() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            fail: true,
        }
    }

    /// Number of rows in a table
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|rows| rows.len())
            .unwrap_or(0)
    }

    /// Fetch one row by key
    pub fn row(&self, table: &str, key: &str) -> Option<serde_json::Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .and_then(|rows| rows.get(key).cloned())
    }
}

impl Default for MemoryRowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RowStore for MemoryRowStore {
    async fn upsert(
        &self,
        table: &str,
        key: &str,
        row: &serde_json::Value,
    ) -> Result<(), ContractError> {
        if self.fail {
            return Err(ContractError::store_write(table, "injected failure"));
        }
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), row.clone());
        Ok(())
    }
}
