use std::collections::HashMap;
use std::sync::Mutex;

use lettervideo_domain::{DomainError, KeyValueStore};

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let values = self
            .values
            .lock()
            .map_err(|_| DomainError::storage_error("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| DomainError::storage_error("memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| DomainError::storage_error("memory store lock poisoned"))?;
        values.remove(key);
        Ok(())
    }
}
