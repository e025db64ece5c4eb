//! The persistence port for priority configs.
//!
//! How config rows are stored is someone else's concern; the engine only
//! needs fetch and persist. `MemoryStore` is the default wiring and the
//! test double.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::model::PriorityConfig;
use crate::error::ConfigError;

/// A persisted config with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
    pub config: PriorityConfig,
    pub updated_at: DateTime<Utc>,
    pub source: String,
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the stored config, `None` when nothing was ever saved.
    async fn fetch(&self) -> Result<Option<StoredConfig>, ConfigError>;

    /// Persist a full config, returning the stored record.
    async fn persist(&self, config: &PriorityConfig) -> Result<StoredConfig, ConfigError>;
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryStore {
    record: Mutex<Option<StoredConfig>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing record (e.g. a fixture).
    pub fn with_record(record: StoredConfig) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn fetch(&self) -> Result<Option<StoredConfig>, ConfigError> {
        Ok(self.record.lock().clone())
    }

    async fn persist(&self, config: &PriorityConfig) -> Result<StoredConfig, ConfigError> {
        let record = StoredConfig {
            config: config.clone(),
            updated_at: Utc::now(),
            source: "memory".to_string(),
        };
        *self.record.lock() = Some(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_starts_empty_and_persist_round_trips() {
        let store = MemoryStore::new();
        assert!(store.fetch().await.unwrap().is_none());

        let config = PriorityConfig::default().with_unread_bonus(22.0);
        let saved = store.persist(&config).await.unwrap();
        assert_eq!(saved.source, "memory");

        let fetched = store.fetch().await.unwrap().expect("record");
        assert_eq!(fetched.config.email.unread_bonus, 22.0);
    }
}
