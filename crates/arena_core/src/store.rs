//! Table-oriented transition store

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Record field holding the per-step liveness mask.
pub const ACTIVE_MASK: &str = "active_mask";

/// One stored transition: field name to value.
pub type Record = BTreeMap<String, Value>;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("table not found: {0}")]
    UnknownTable(String),

    #[error("table already exists: {0}")]
    TableExists(String),
}

/// Metadata returned alongside a sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleInfo {
    /// Records held by the table at sampling time
    pub table_size: usize,
}

/// Named tables of transitions that rollouts push into and trainers sample from.
pub trait SampleStore {
    fn create_table(&mut self, name: &str) -> Result<(), StoreError>;

    fn push(&mut self, name: &str, records: Vec<Record>) -> Result<(), StoreError>;

    /// Return up to `batch_size` records from the table.
    fn sample(&self, name: &str, batch_size: usize) -> Result<(Vec<Record>, SampleInfo), StoreError>;
}

/// Table name used for the transitions of one (agent, policy) pair.
///
/// Shared policies collapse onto a single table per policy.
pub fn default_table_name(agent_id: &str, policy_id: &str, share_policies: bool) -> String {
    if share_policies {
        policy_id.to_string()
    } else {
        format!("{}_{}", agent_id, policy_id)
    }
}

/// Process-local store; tables keep every pushed record.
#[derive(Debug, Default)]
pub struct MemorySampleStore {
    tables: HashMap<String, Vec<Record>>,
}

impl MemorySampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_len(&self, name: &str) -> Option<usize> {
        self.tables.get(name).map(Vec::len)
    }
}

impl SampleStore for MemorySampleStore {
    fn create_table(&mut self, name: &str) -> Result<(), StoreError> {
        if self.tables.contains_key(name) {
            return Err(StoreError::TableExists(name.to_string()));
        }
        self.tables.insert(name.to_string(), Vec::new());
        Ok(())
    }

    fn push(&mut self, name: &str, records: Vec<Record>) -> Result<(), StoreError> {
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))?;
        table.extend(records);
        Ok(())
    }

    fn sample(&self, name: &str, batch_size: usize) -> Result<(Vec<Record>, SampleInfo), StoreError> {
        let table = self
            .tables
            .get(name)
            .ok_or_else(|| StoreError::UnknownTable(name.to_string()))?;
        // Most recent transitions first
        let batch = table.iter().rev().take(batch_size).cloned().collect();
        Ok((
            batch,
            SampleInfo {
                table_size: table.len(),
            },
        ))
    }
}
