//! Priority scoring and ranking engine for the Backline inbox/project/
//! calendar workspace.
//!
//! The engine is pure: `PriorityScorer::compute`, action-rule matching and
//! config normalization are synchronous, side-effect-free functions over
//! immutable inputs, safe to call once per visible card with no
//! coordination. Concurrency lives only at the boundary
//! (`services::ConfigService`): loading, saving, resetting and applying
//! presets, with at most one in-flight save and a session cancelled-guard.

pub mod capabilities;
pub mod config;
pub mod error;
pub mod ids;
pub mod samples;
pub mod scoring;
pub mod services;
pub mod types;

pub use capabilities::EngineCapabilities;
pub use config::{ConfigValidator, PresetManager, PriorityConfig};
pub use error::{ConfigError, IMPORT_FAILED_MESSAGE};
pub use scoring::{ActionRuleMatcher, PriorityScorer};
pub use types::{
    zone_for, EntityKind, EntitySnapshot, PriorityZone, ScoreComponent, ScoreResult, TriageState,
};
