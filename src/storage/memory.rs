use crate::error::Res;
use crate::storage::Storage;
use anyhow::bail;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// An implementation of `Storage` that holds everything in memory.
///
/// An optional quota, measured in total bytes across all values, makes writes fail the way a
/// full disk or a browser storage quota would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage that refuses writes which would bring the total stored bytes above
    /// `quota`.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            data: Arc::default(),
            quota: Some(quota),
        }
    }

    /// Returns a copy of the raw contents.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Res<Option<String>> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Res<()> {
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(quota) = self.quota {
            let others: usize = data
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > quota {
                bail!(
                    "Storage quota of {quota} bytes exceeded while writing '{key}' ({} bytes)",
                    value.len()
                );
            }
        }
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Res<()> {
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let storage = MemoryStorage::new();
        storage.set("dark_mode", "false").await.unwrap();
        assert_eq!(
            storage.get("dark_mode").await.unwrap().as_deref(),
            Some("false")
        );
        storage.remove("dark_mode").await.unwrap();
        assert!(storage.get("dark_mode").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_quota_rejects_and_keeps_old_value() {
        let storage = MemoryStorage::with_quota(8);
        storage.set("goals", "[]").await.unwrap();
        assert!(storage.set("goals", "[1,2,3,4,5]").await.is_err());
        assert_eq!(storage.get("goals").await.unwrap().as_deref(), Some("[]"));
        // Overwriting a key does not count its old value against the quota
        storage.set("goals", "[1,2,3]").await.unwrap();
    }
}
