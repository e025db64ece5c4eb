//! Boundary services: the persistence port, the config load/save service,
//! and import/export.

pub mod config;
pub mod export;
pub mod store;

pub use config::{ConfigService, LoadResult, PresetOutcome, ResetOutcome, SaveResult};
pub use store::{ConfigStore, MemoryStore, StoredConfig};
