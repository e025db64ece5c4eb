//! Error types for configuration handling.
//!
//! Scoring itself has no error conditions — `compute` is total over
//! well-typed entities. Errors only arise at the config boundary:
//! import/normalize, preset lookup, and the load/save round-trip.

use thiserror::Error;

/// User-facing message surfaced when an import payload cannot be normalized.
/// Shown inline; the current config is left untouched.
pub const IMPORT_FAILED_MESSAGE: &str =
    "Failed to import configuration. Please provide a valid export.";

/// Errors from the configuration boundary.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `normalize` rejects only payloads whose root is not a JSON object
    /// (a string or array at the root). Anything object-shaped is repaired
    /// field-by-field instead.
    #[error("configuration payload must be a JSON object")]
    NotAnObject,

    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("store error: {0}")]
    Store(String),

    /// A save was requested while another save is still pending.
    #[error("a save is already in flight")]
    SaveInFlight,

    /// The session token rotated while the operation was in flight; the
    /// result was discarded, not applied.
    #[error("session is no longer current")]
    StaleSession,

    #[error("IO error: {0}")]
    Io(String),
}

impl ConfigError {
    /// Returns true when the error should surface as a non-blocking banner
    /// rather than an inline form error.
    pub fn is_degraded_operation(&self) -> bool {
        matches!(self, ConfigError::Store(_) | ConfigError::Io(_))
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}
