//! Config import/export.
//!
//! Export serializes the current config to pretty-printed JSON under a
//! dated filename. Import pipes the payload back through the validator;
//! a failure surfaces the fixed user-facing message and never mutates
//! state (import is a pure function — the caller only replaces its config
//! on success).

use std::path::Path;

use chrono::NaiveDate;

use crate::config::model::PriorityConfig;
use crate::config::validate::ConfigValidator;
use crate::error::ConfigError;

/// `priority-config-<YYYY-MM-DD>.json`
pub fn export_filename(date: NaiveDate) -> String {
    format!("priority-config-{}.json", date.format("%Y-%m-%d"))
}

/// Pretty-printed JSON for the export download.
pub fn export_config(config: &PriorityConfig) -> Result<String, ConfigError> {
    serde_json::to_string_pretty(config).map_err(|e| ConfigError::Io(e.to_string()))
}

/// Parse and normalize an import payload. Any failure maps to
/// `NotAnObject`; the caller surfaces [`crate::error::IMPORT_FAILED_MESSAGE`].
pub fn import_config(
    validator: &ConfigValidator,
    payload: &str,
) -> Result<PriorityConfig, ConfigError> {
    let raw: serde_json::Value =
        serde_json::from_str(payload).map_err(|_| ConfigError::NotAnObject)?;
    validator.normalize(&raw)
}

/// Write an export file.
pub fn write_export(path: &Path, config: &PriorityConfig) -> Result<(), ConfigError> {
    std::fs::write(path, export_config(config)?)?;
    Ok(())
}

/// Read and normalize an import file.
pub fn read_import(
    validator: &ConfigValidator,
    path: &Path,
) -> Result<PriorityConfig, ConfigError> {
    let payload = std::fs::read_to_string(path)?;
    import_config(validator, &payload)
}
