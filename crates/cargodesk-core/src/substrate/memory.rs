//! In-memory substrate
//!
//! Backs a store with a plain map. Nothing is persisted across instances;
//! used by tests and by consumers that want a throwaway store.

use std::collections::HashMap;
use std::sync::Mutex;

use super::error::SubstrateResult;
use super::Substrate;

/// Ephemeral substrate holding all keys in memory
#[derive(Default)]
pub struct MemorySubstrate {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySubstrate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Substrate for MemorySubstrate {
    fn read(&self, key: &str) -> SubstrateResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> SubstrateResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SubstrateResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}
