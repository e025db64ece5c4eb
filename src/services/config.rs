//! The config boundary service.
//!
//! Owns the single "current config" slot plus the last-persisted baseline.
//! The engine underneath is pure; all concurrency discipline lives here:
//! at most one in-flight save, a session cancelled-guard (results of
//! operations started under an old session token are discarded, the
//! request itself is not aborted), and fail-open behavior on load and
//! persist failures — local edits stay, a warning is surfaced for a
//! non-blocking banner.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::config::defaults;
use crate::config::model::PriorityConfig;
use crate::config::presets::PresetManager;
use crate::config::validate::ConfigValidator;
use crate::error::ConfigError;

use super::store::ConfigStore;

/// Result of a load: the active config plus provenance. `warning` is set
/// when the store failed and the built-in default was substituted.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub config: PriorityConfig,
    pub updated_at: DateTime<Utc>,
    pub source: String,
    pub warning: Option<String>,
}

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SaveResult {
    pub config: PriorityConfig,
    pub updated_at: DateTime<Utc>,
    pub source: String,
}

/// Result of a category reset.
#[derive(Debug, Clone)]
pub struct ResetOutcome {
    pub config: PriorityConfig,
    pub reset_categories: Vec<String>,
}

/// Result of applying a preset.
#[derive(Debug, Clone)]
pub struct PresetOutcome {
    pub config: PriorityConfig,
    pub preset_name: String,
}

pub struct ConfigService {
    store: Arc<dyn ConfigStore>,
    validator: ConfigValidator,
    presets: PresetManager,
    current: Mutex<PriorityConfig>,
    baseline: Mutex<PriorityConfig>,
    save_in_flight: AtomicBool,
    session: AtomicU64,
}

/// Clears the in-flight flag on every exit path from `save`.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ConfigService {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        let config = defaults::default_config();
        Self {
            store,
            validator: ConfigValidator::default(),
            presets: PresetManager::default(),
            current: Mutex::new(config.clone()),
            baseline: Mutex::new(config),
            save_in_flight: AtomicBool::new(false),
            session: AtomicU64::new(0),
        }
    }

    /// Cloned copy of the working config — never an alias into the slot.
    pub fn current(&self) -> PriorityConfig {
        self.current.lock().clone()
    }

    /// Cloned copy of the last persisted config.
    pub fn baseline(&self) -> PriorityConfig {
        self.baseline.lock().clone()
    }

    /// Whether the working config differs structurally from the baseline.
    pub fn is_dirty(&self) -> bool {
        !ConfigValidator::configs_equal(&self.current.lock(), &self.baseline.lock())
    }

    /// Replace the working config wholesale (the edit path: callers clone,
    /// patch via the typed updaters, then hand the result back).
    pub fn set_current(&self, config: PriorityConfig) {
        *self.current.lock() = config;
    }

    /// Rotate the session token. In-flight operation results started under
    /// the old token will be discarded when they complete.
    pub fn invalidate_session(&self) {
        self.session.fetch_add(1, Ordering::SeqCst);
    }

    fn session_token(&self) -> u64 {
        self.session.load(Ordering::SeqCst)
    }

    /// Load the stored config into the current and baseline slots.
    ///
    /// Store failure falls back to the built-in default rather than
    /// blocking the rest of the UI; the error text comes back in
    /// `warning` for a non-blocking banner.
    pub async fn load(&self) -> Result<LoadResult, ConfigError> {
        let token = self.session_token();
        let fetched = self.store.fetch().await;
        if self.session_token() != token {
            log::info!("Discarding config load result: session rotated mid-flight");
            return Err(ConfigError::StaleSession);
        }

        let (config, updated_at, source, warning) = match fetched {
            Ok(Some(record)) => {
                // Stored rows can predate the current schema; normalize
                // repairs rather than rejects.
                let raw = serde_json::to_value(&record.config)
                    .map_err(|e| ConfigError::Store(e.to_string()))?;
                let config = self.validator.normalize(&raw)?;
                (config, record.updated_at, record.source, None)
            }
            Ok(None) => (
                defaults::default_config(),
                Utc::now(),
                "default".to_string(),
                None,
            ),
            Err(e) => {
                log::warn!("Config load failed, falling back to defaults: {}", e);
                (
                    defaults::default_config(),
                    Utc::now(),
                    "default".to_string(),
                    Some(e.to_string()),
                )
            }
        };

        *self.current.lock() = config.clone();
        *self.baseline.lock() = config.clone();

        Ok(LoadResult {
            config,
            updated_at,
            source,
            warning,
        })
    }

    /// Persist the working config. At most one save may be in flight; the
    /// UI disables the save action while one is pending, and a second
    /// caller gets `SaveInFlight`.
    pub async fn save(&self) -> Result<SaveResult, ConfigError> {
        if self.save_in_flight.swap(true, Ordering::SeqCst) {
            return Err(ConfigError::SaveInFlight);
        }
        let _guard = InFlightGuard(&self.save_in_flight);

        let token = self.session_token();
        let config = self.current();
        let record = self.store.persist(&config).await?;

        if self.session_token() != token {
            log::info!("Discarding config save result: session rotated mid-flight");
            return Err(ConfigError::StaleSession);
        }

        *self.baseline.lock() = config.clone();
        Ok(SaveResult {
            config,
            updated_at: record.updated_at,
            source: record.source,
        })
    }

    /// Reset all-or-named category weights to defaults, replace the
    /// working config, then persist. The in-memory replacement lands
    /// before the persistence round-trip; a persist failure leaves it in
    /// place (fail-open, no rollback).
    pub async fn reset(
        &self,
        categories: Option<&[String]>,
    ) -> Result<ResetOutcome, ConfigError> {
        let (next, changed) = PresetManager::reset(&self.current(), categories);
        self.set_current(next.clone());

        match self.store.persist(&next).await {
            Ok(_) => {
                *self.baseline.lock() = next.clone();
            }
            Err(e) => {
                log::warn!("Persisting category reset failed, keeping local edit: {}", e);
                return Err(e);
            }
        }

        Ok(ResetOutcome {
            config: next,
            reset_categories: changed,
        })
    }

    /// Preset slug designated by the first active auto-apply schedule
    /// entry at `now`, when scheduling is enabled. Execution is the
    /// caller's decision — this only evaluates the windows.
    pub fn scheduled_preset_slug(
        &self,
        capabilities: &crate::capabilities::EngineCapabilities,
        now: DateTime<Utc>,
    ) -> Option<String> {
        if !capabilities.scheduling {
            return None;
        }
        let current = self.current.lock();
        crate::config::schedule::active_entry(&current.scheduling, now)
            .map(|entry| entry.preset_slug.clone())
    }

    /// Apply a named preset: wholesale replacement of the entire config,
    /// never a merge. Same fail-open persistence contract as `reset`.
    pub async fn apply_preset(&self, slug: &str) -> Result<PresetOutcome, ConfigError> {
        let doc = PresetManager::get(slug)?;
        let next = self.presets.apply(slug)?;
        self.set_current(next.clone());

        match self.store.persist(&next).await {
            Ok(_) => {
                *self.baseline.lock() = next.clone();
            }
            Err(e) => {
                log::warn!(
                    "Persisting preset '{}' failed, keeping local application: {}",
                    slug,
                    e
                );
                return Err(e);
            }
        }

        Ok(PresetOutcome {
            config: next,
            preset_name: doc.name,
        })
    }
}
