//! Priority configuration: the data model, built-in defaults, the
//! normalizing validator, named presets, and schedule-window evaluation.

pub mod defaults;
pub mod model;
pub mod presets;
pub mod schedule;
pub mod validate;

pub use model::{
    ActionRule, ActionType, AdvancedBoost, BoostCriteria, ConflictPenalties, CrossLabelRule,
    DependencyPenalties, EmailConfig, IdleAgeConfig, PriorityConfig, ScheduleEntry,
    SchedulingConfig, TasksConfig, TimeConfig, TimelineConfig,
};
pub use presets::{PresetManager, PresetSummary};
pub use validate::ConfigValidator;
