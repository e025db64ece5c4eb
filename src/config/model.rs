//! The `PriorityConfig` value type.
//!
//! A config is always handled by value: editing paths clone first, patch
//! the clone, and replace the current slot wholesale. Every numeric field
//! clamps to its documented range on write, never on read. Equality is
//! structural (`PartialEq`); the category-weight map compares by key/value
//! regardless of enumeration order, the rule arrays element-by-element in
//! order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Documented ranges, used by the write-side clamps and by `normalize`.
pub mod ranges {
    pub const CATEGORY_WEIGHT: (f64, f64) = (0.0, 100.0);
    pub const UNREAD_BONUS: (f64, f64) = (0.0, 100.0);
    pub const BLEND_WEIGHT: (f64, f64) = (0.0, 1.0);
    pub const SNOOZE_AGE_REDUCTION: (f64, f64) = (0.0, 1.0);
    pub const CROSS_LABEL_WEIGHT: (f64, f64) = (-200.0, 200.0);
    pub const BOOST_WEIGHT: (f64, f64) = (-100.0, 200.0);
    pub const UPCOMING_DECAY_PER_DAY: (f64, f64) = (0.0, 50.0);
    pub const OVERDUE_PENALTY_PER_DAY: (f64, f64) = (0.0, 100.0);
    pub const UNDATED_VALUE: (f64, f64) = (0.0, 100.0);
    pub const CONFLICT_PENALTY: (f64, f64) = (0.0, 200.0);
    pub const DEPENDENCY_PENALTY: (f64, f64) = (0.0, 200.0);
}

/// Clamp a user-entered number into range. Non-finite input is ignored and
/// the prior valid value retained — this is deliberate fail-safe behavior
/// for free-form numeric fields, not an error path.
pub(crate) fn patch_number(current: f64, input: f64, range: (f64, f64)) -> f64 {
    if !input.is_finite() {
        return current;
    }
    input.clamp(range.0, range.1)
}

// =============================================================================
// Root config
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityConfig {
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        super::defaults::default_config()
    }
}

/// Email scoring knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailConfig {
    /// Category label → base weight (0–100).
    #[serde(default)]
    pub category_weights: HashMap<String, f64>,
    #[serde(default = "default_category_weight")]
    pub default_category_weight: f64,
    #[serde(default = "default_unread_bonus")]
    pub unread_bonus: f64,
    /// Blend of the classifier's estimated priority into the computed
    /// score (0 ignores the model, 1 takes it verbatim).
    #[serde(default = "default_model_priority_weight")]
    pub model_priority_weight: f64,
    /// Multiplier applied as `total × (1 − reduction)` while snoozed.
    #[serde(default = "default_snooze_age_reduction")]
    pub snooze_age_reduction: f64,
    #[serde(default)]
    pub idle_age: IdleAgeConfig,
    #[serde(default)]
    pub cross_label_rules: Vec<CrossLabelRule>,
    #[serde(default)]
    pub advanced_boosts: Vec<AdvancedBoost>,
    #[serde(default)]
    pub action_rules: Vec<ActionRule>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            category_weights: HashMap::new(),
            default_category_weight: default_category_weight(),
            unread_bonus: default_unread_bonus(),
            model_priority_weight: default_model_priority_weight(),
            snooze_age_reduction: default_snooze_age_reduction(),
            idle_age: IdleAgeConfig::default(),
            cross_label_rules: Vec::new(),
            advanced_boosts: Vec::new(),
            action_rules: Vec::new(),
        }
    }
}

fn default_category_weight() -> f64 {
    40.0
}

fn default_unread_bonus() -> f64 {
    15.0
}

fn default_model_priority_weight() -> f64 {
    0.3
}

fn default_snooze_age_reduction() -> f64 {
    0.6
}

/// Idle-thread handling: once an unread thread has idled past the long
/// window, its accumulated age delta is multiplied up so stale-but-unread
/// conversations resurface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleAgeConfig {
    #[serde(default = "default_long_window_days")]
    pub long_window_days: f64,
    #[serde(default = "default_long_window_multiplier")]
    pub long_window_multiplier: f64,
}

impl Default for IdleAgeConfig {
    fn default() -> Self {
        Self {
            long_window_days: default_long_window_days(),
            long_window_multiplier: default_long_window_multiplier(),
        }
    }
}

fn default_long_window_days() -> f64 {
    7.0
}

fn default_long_window_multiplier() -> f64 {
    1.5
}

/// Time-decay rates shared by all entity kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeConfig {
    /// Subtracted per day until a future-dated entity comes due (0–50).
    #[serde(default = "default_upcoming_decay_per_day")]
    pub upcoming_decay_per_day: f64,
    /// Added per day an entity is overdue or an email sits idle (0–100).
    #[serde(default = "default_overdue_penalty_per_day")]
    pub overdue_penalty_per_day: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            upcoming_decay_per_day: default_upcoming_decay_per_day(),
            overdue_penalty_per_day: default_overdue_penalty_per_day(),
        }
    }
}

fn default_upcoming_decay_per_day() -> f64 {
    2.0
}

fn default_overdue_penalty_per_day() -> f64 {
    5.0
}

/// Timeline-item scoring knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineConfig {
    #[serde(default = "default_timeline_manual_weight")]
    pub manual_priority_weight: f64,
    /// Base value for items with no start/due date (0–100).
    #[serde(default = "default_undated_value")]
    pub undated_value: f64,
    #[serde(default)]
    pub conflict_penalties: ConflictPenalties,
    #[serde(default)]
    pub dependency_penalties: DependencyPenalties,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            manual_priority_weight: default_timeline_manual_weight(),
            undated_value: default_undated_value(),
            conflict_penalties: ConflictPenalties::default(),
            dependency_penalties: DependencyPenalties::default(),
        }
    }
}

fn default_timeline_manual_weight() -> f64 {
    0.5
}

fn default_undated_value() -> f64 {
    35.0
}

/// Per-conflict penalties subtracted from a timeline item (0–200 each).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictPenalties {
    #[serde(default = "default_conflict_default")]
    pub default: f64,
    #[serde(default = "default_conflict_error")]
    pub error: f64,
}

impl Default for ConflictPenalties {
    fn default() -> Self {
        Self {
            default: default_conflict_default(),
            error: default_conflict_error(),
        }
    }
}

fn default_conflict_default() -> f64 {
    10.0
}

fn default_conflict_error() -> f64 {
    25.0
}

/// Per-blocking-predecessor penalties (0–200 each).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyPenalties {
    #[serde(default = "default_dependency_fts")]
    pub finish_to_start: f64,
    #[serde(default = "default_dependency_other")]
    pub other: f64,
}

impl Default for DependencyPenalties {
    fn default() -> Self {
        Self {
            finish_to_start: default_dependency_fts(),
            other: default_dependency_other(),
        }
    }
}

fn default_dependency_fts() -> f64 {
    15.0
}

fn default_dependency_other() -> f64 {
    8.0
}

/// Task scoring knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksConfig {
    #[serde(default = "default_tasks_manual_weight")]
    pub manual_priority_weight: f64,
    #[serde(default = "default_no_due_date_value")]
    pub no_due_date_value: f64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            manual_priority_weight: default_tasks_manual_weight(),
            no_due_date_value: default_no_due_date_value(),
        }
    }
}

fn default_tasks_manual_weight() -> f64 {
    0.6
}

fn default_no_due_date_value() -> f64 {
    30.0
}

/// Preset scheduling: which preset should be considered active in a given
/// day/time window. Evaluation is the pure predicate in
/// `config::schedule`; nothing here triggers execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingConfig {
    /// IANA timezone name the windows are interpreted in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub entries: Vec<ScheduleEntry>,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            entries: Vec::new(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// One day/time window designating a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub label: String,
    pub preset_slug: String,
    /// 0 = Sunday … 6 = Saturday.
    #[serde(default)]
    pub days_of_week: Vec<u8>,
    /// "HH:MM" in the configured timezone.
    pub start_time: String,
    /// "HH:MM", or `None` for open-ended until end of day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default)]
    pub auto_apply: bool,
}

// =============================================================================
// Rules
// =============================================================================

/// Prefix-match boost against an entity's label set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossLabelRule {
    pub prefix: String,
    #[serde(default)]
    pub description: String,
    /// −200..200, summed once per matching rule.
    #[serde(default)]
    pub weight: f64,
    /// Case rule applies to the comparison only, never the stored labels.
    #[serde(default)]
    pub case_insensitive: bool,
}

/// Multi-criteria conditional boost with a per-boost explanation label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedBoost {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// −100..200.
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub criteria: BoostCriteria,
}

/// Criteria for an advanced boost. An empty list or `None` is a wildcard;
/// non-empty lists match if any element matches (OR within a kind, AND
/// across kinds).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostCriteria {
    #[serde(default)]
    pub senders: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_attachment: Option<bool>,
    /// Compared against the running score at evaluation time, so a boost
    /// can depend on the steps (and boosts) applied before it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_priority: Option<f64>,
}

/// UI-triggerable action gated by category, triage state and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub action_type: ActionType,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub triage_states: Vec<crate::types::TriageState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_priority: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Opaque payload handed back to the UI when the action fires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Playbook,
    CreateLead,
    OpenUrl,
    Custom,
}

// =============================================================================
// Clone-then-patch updaters
// =============================================================================

impl PriorityConfig {
    /// Set one category weight, clamped to 0–100.
    pub fn with_category_weight(&self, label: &str, weight: f64) -> Self {
        let mut next = self.clone();
        let current = next
            .email
            .category_weights
            .get(label)
            .copied()
            .unwrap_or(next.email.default_category_weight);
        next.email
            .category_weights
            .insert(label.to_string(), patch_number(current, weight, ranges::CATEGORY_WEIGHT));
        next
    }

    pub fn with_default_category_weight(&self, weight: f64) -> Self {
        let mut next = self.clone();
        next.email.default_category_weight = patch_number(
            next.email.default_category_weight,
            weight,
            ranges::CATEGORY_WEIGHT,
        );
        next
    }

    pub fn with_unread_bonus(&self, bonus: f64) -> Self {
        let mut next = self.clone();
        next.email.unread_bonus = patch_number(next.email.unread_bonus, bonus, ranges::UNREAD_BONUS);
        next
    }

    pub fn with_model_priority_weight(&self, weight: f64) -> Self {
        let mut next = self.clone();
        next.email.model_priority_weight =
            patch_number(next.email.model_priority_weight, weight, ranges::BLEND_WEIGHT);
        next
    }

    pub fn with_snooze_age_reduction(&self, reduction: f64) -> Self {
        let mut next = self.clone();
        next.email.snooze_age_reduction = patch_number(
            next.email.snooze_age_reduction,
            reduction,
            ranges::SNOOZE_AGE_REDUCTION,
        );
        next
    }

    pub fn with_idle_age(&self, long_window_days: f64, multiplier: f64) -> Self {
        let mut next = self.clone();
        next.email.idle_age.long_window_days =
            patch_number(next.email.idle_age.long_window_days, long_window_days, (0.0, f64::MAX));
        next.email.idle_age.long_window_multiplier = patch_number(
            next.email.idle_age.long_window_multiplier,
            multiplier,
            (0.0, f64::MAX),
        );
        next
    }

    /// Replace the cross-label rule list, clamping each weight.
    pub fn with_cross_label_rules(&self, rules: Vec<CrossLabelRule>) -> Self {
        let mut next = self.clone();
        next.email.cross_label_rules = rules
            .into_iter()
            .map(|mut r| {
                r.weight = patch_number(0.0, r.weight, ranges::CROSS_LABEL_WEIGHT);
                r
            })
            .collect();
        next
    }

    /// Replace the advanced boost list, clamping each weight.
    pub fn with_advanced_boosts(&self, boosts: Vec<AdvancedBoost>) -> Self {
        let mut next = self.clone();
        next.email.advanced_boosts = boosts
            .into_iter()
            .map(|mut b| {
                b.weight = patch_number(0.0, b.weight, ranges::BOOST_WEIGHT);
                b
            })
            .collect();
        next
    }

    pub fn with_action_rules(&self, rules: Vec<ActionRule>) -> Self {
        let mut next = self.clone();
        next.email.action_rules = rules;
        next
    }

    pub fn with_time_decay(&self, upcoming_per_day: f64, overdue_per_day: f64) -> Self {
        let mut next = self.clone();
        next.time.upcoming_decay_per_day = patch_number(
            next.time.upcoming_decay_per_day,
            upcoming_per_day,
            ranges::UPCOMING_DECAY_PER_DAY,
        );
        next.time.overdue_penalty_per_day = patch_number(
            next.time.overdue_penalty_per_day,
            overdue_per_day,
            ranges::OVERDUE_PENALTY_PER_DAY,
        );
        next
    }

    pub fn with_timeline_manual_weight(&self, weight: f64) -> Self {
        let mut next = self.clone();
        next.timeline.manual_priority_weight = patch_number(
            next.timeline.manual_priority_weight,
            weight,
            ranges::BLEND_WEIGHT,
        );
        next
    }

    pub fn with_conflict_penalties(&self, default: f64, error: f64) -> Self {
        let mut next = self.clone();
        next.timeline.conflict_penalties.default = patch_number(
            next.timeline.conflict_penalties.default,
            default,
            ranges::CONFLICT_PENALTY,
        );
        next.timeline.conflict_penalties.error = patch_number(
            next.timeline.conflict_penalties.error,
            error,
            ranges::CONFLICT_PENALTY,
        );
        next
    }

    pub fn with_dependency_penalties(&self, finish_to_start: f64, other: f64) -> Self {
        let mut next = self.clone();
        next.timeline.dependency_penalties.finish_to_start = patch_number(
            next.timeline.dependency_penalties.finish_to_start,
            finish_to_start,
            ranges::DEPENDENCY_PENALTY,
        );
        next.timeline.dependency_penalties.other = patch_number(
            next.timeline.dependency_penalties.other,
            other,
            ranges::DEPENDENCY_PENALTY,
        );
        next
    }

    pub fn with_tasks_manual_weight(&self, weight: f64) -> Self {
        let mut next = self.clone();
        next.tasks.manual_priority_weight =
            patch_number(next.tasks.manual_priority_weight, weight, ranges::BLEND_WEIGHT);
        next
    }

    pub fn with_scheduling_timezone(&self, timezone: &str) -> Self {
        let mut next = self.clone();
        next.scheduling.timezone = timezone.to_string();
        next
    }

    pub fn with_schedule_entries(&self, entries: Vec<ScheduleEntry>) -> Self {
        let mut next = self.clone();
        next.scheduling.entries = entries;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_weight_clamps_on_write() {
        let config = PriorityConfig::default();
        let up = config.with_category_weight("BOOKING/Offer", 150.0);
        assert_eq!(up.email.category_weights["BOOKING/Offer"], 100.0);
        let down = config.with_category_weight("BOOKING/Offer", -20.0);
        assert_eq!(down.email.category_weights["BOOKING/Offer"], 0.0);
    }

    #[test]
    fn non_finite_input_retains_prior_value() {
        let config = PriorityConfig::default().with_unread_bonus(25.0);
        let patched = config.with_unread_bonus(f64::NAN);
        assert_eq!(patched.email.unread_bonus, 25.0);
        let patched = config.with_unread_bonus(f64::INFINITY);
        assert_eq!(patched.email.unread_bonus, 25.0);
    }

    #[test]
    fn updaters_never_mutate_the_source() {
        let config = PriorityConfig::default();
        let before = config.clone();
        let _ = config.with_unread_bonus(99.0);
        let _ = config.with_category_weight("LEGAL/Contract", 90.0);
        assert_eq!(config, before);
    }

    #[test]
    fn equality_ignores_map_enumeration_order() {
        let a = PriorityConfig::default()
            .with_category_weight("BOOKING/Offer", 85.0)
            .with_category_weight("LEGAL/Contract", 75.0);
        let b = PriorityConfig::default()
            .with_category_weight("LEGAL/Contract", 75.0)
            .with_category_weight("BOOKING/Offer", 85.0);
        assert_eq!(a, b);
    }

    #[test]
    fn blend_weights_clamp_to_unit_interval() {
        let config = PriorityConfig::default().with_timeline_manual_weight(3.0);
        assert_eq!(config.timeline.manual_priority_weight, 1.0);
        let config = config.with_tasks_manual_weight(-0.5);
        assert_eq!(config.tasks.manual_priority_weight, 0.0);
    }
}
