//! Normalization of arbitrary config payloads.
//!
//! Import, reset and preset-apply all funnel raw JSON through
//! [`ConfigValidator::normalize`], which repairs rather than rejects:
//! every missing or malformed field falls back to its default, every
//! numeric clamps to its documented range, and rule entries missing an
//! `id` get one regenerated. The only hard failure is a payload whose
//! root is not a JSON object.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::ids::{IdGenerator, UuidIds};
use crate::types::TriageState;

use super::defaults;
use super::model::{
    ranges, ActionRule, ActionType, AdvancedBoost, BoostCriteria, CrossLabelRule, PriorityConfig,
    ScheduleEntry,
};

pub struct ConfigValidator {
    ids: Arc<dyn IdGenerator>,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new(Arc::new(UuidIds))
    }
}

impl ConfigValidator {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Normalize an arbitrary JSON value into a well-formed config.
    ///
    /// Fails only when `raw` is not an object at the root (a string or
    /// array, say). Everything else is repaired in place against the
    /// built-in defaults.
    pub fn normalize(&self, raw: &Value) -> Result<PriorityConfig, ConfigError> {
        let root = raw.as_object().ok_or(ConfigError::NotAnObject)?;
        let base = defaults::default_config();

        let mut config = base.clone();

        if let Some(email) = root.get("email").and_then(Value::as_object) {
            self.normalize_email(email, &base, &mut config);
        }
        if let Some(time) = root.get("time").and_then(Value::as_object) {
            config.time.upcoming_decay_per_day = num(
                time,
                "upcomingDecayPerDay",
                base.time.upcoming_decay_per_day,
                ranges::UPCOMING_DECAY_PER_DAY,
            );
            config.time.overdue_penalty_per_day = num(
                time,
                "overduePenaltyPerDay",
                base.time.overdue_penalty_per_day,
                ranges::OVERDUE_PENALTY_PER_DAY,
            );
        }
        if let Some(timeline) = root.get("timeline").and_then(Value::as_object) {
            config.timeline.manual_priority_weight = num(
                timeline,
                "manualPriorityWeight",
                base.timeline.manual_priority_weight,
                ranges::BLEND_WEIGHT,
            );
            config.timeline.undated_value = num(
                timeline,
                "undatedValue",
                base.timeline.undated_value,
                ranges::UNDATED_VALUE,
            );
            if let Some(cp) = timeline.get("conflictPenalties").and_then(Value::as_object) {
                config.timeline.conflict_penalties.default = num(
                    cp,
                    "default",
                    base.timeline.conflict_penalties.default,
                    ranges::CONFLICT_PENALTY,
                );
                config.timeline.conflict_penalties.error = num(
                    cp,
                    "error",
                    base.timeline.conflict_penalties.error,
                    ranges::CONFLICT_PENALTY,
                );
            }
            if let Some(dp) = timeline.get("dependencyPenalties").and_then(Value::as_object) {
                config.timeline.dependency_penalties.finish_to_start = num(
                    dp,
                    "finishToStart",
                    base.timeline.dependency_penalties.finish_to_start,
                    ranges::DEPENDENCY_PENALTY,
                );
                config.timeline.dependency_penalties.other = num(
                    dp,
                    "other",
                    base.timeline.dependency_penalties.other,
                    ranges::DEPENDENCY_PENALTY,
                );
            }
        }
        if let Some(tasks) = root.get("tasks").and_then(Value::as_object) {
            config.tasks.manual_priority_weight = num(
                tasks,
                "manualPriorityWeight",
                base.tasks.manual_priority_weight,
                ranges::BLEND_WEIGHT,
            );
            config.tasks.no_due_date_value = num(
                tasks,
                "noDueDateValue",
                base.tasks.no_due_date_value,
                ranges::UNDATED_VALUE,
            );
        }
        if let Some(scheduling) = root.get("scheduling").and_then(Value::as_object) {
            config.scheduling.timezone =
                string(scheduling, "timezone", &base.scheduling.timezone);
            config.scheduling.entries = self.normalize_schedule_entries(scheduling.get("entries"));
        }

        Ok(config)
    }

    /// Deep copy with no shared references to the source.
    pub fn clone_config(config: &PriorityConfig) -> PriorityConfig {
        config.clone()
    }

    /// Structural comparison: map fields by key/value regardless of
    /// enumeration order, array fields element-by-element in order.
    pub fn configs_equal(a: &PriorityConfig, b: &PriorityConfig) -> bool {
        a == b
    }

    fn normalize_email(
        &self,
        email: &Map<String, Value>,
        base: &PriorityConfig,
        config: &mut PriorityConfig,
    ) {
        if let Some(weights) = email.get("categoryWeights").and_then(Value::as_object) {
            config.email.category_weights = weights
                .iter()
                .filter_map(|(label, v)| {
                    v.as_f64().filter(|w| w.is_finite()).map(|w| {
                        (
                            label.clone(),
                            w.clamp(ranges::CATEGORY_WEIGHT.0, ranges::CATEGORY_WEIGHT.1),
                        )
                    })
                })
                .collect();
        }
        config.email.default_category_weight = num(
            email,
            "defaultCategoryWeight",
            base.email.default_category_weight,
            ranges::CATEGORY_WEIGHT,
        );
        config.email.unread_bonus = num(
            email,
            "unreadBonus",
            base.email.unread_bonus,
            ranges::UNREAD_BONUS,
        );
        config.email.model_priority_weight = num(
            email,
            "modelPriorityWeight",
            base.email.model_priority_weight,
            ranges::BLEND_WEIGHT,
        );
        config.email.snooze_age_reduction = num(
            email,
            "snoozeAgeReduction",
            base.email.snooze_age_reduction,
            ranges::SNOOZE_AGE_REDUCTION,
        );
        if let Some(idle) = email.get("idleAge").and_then(Value::as_object) {
            config.email.idle_age.long_window_days = num(
                idle,
                "longWindowDays",
                base.email.idle_age.long_window_days,
                (0.0, f64::MAX),
            );
            config.email.idle_age.long_window_multiplier = num(
                idle,
                "longWindowMultiplier",
                base.email.idle_age.long_window_multiplier,
                (0.0, f64::MAX),
            );
        }
        if let Some(rules) = email.get("crossLabelRules") {
            config.email.cross_label_rules = normalize_cross_label_rules(rules);
        }
        if let Some(boosts) = email.get("advancedBoosts") {
            config.email.advanced_boosts = self.normalize_boosts(boosts);
        }
        if let Some(rules) = email.get("actionRules") {
            config.email.action_rules = self.normalize_action_rules(rules);
        }
    }

    fn normalize_boosts(&self, raw: &Value) -> Vec<AdvancedBoost> {
        let Some(items) = raw.as_array() else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| AdvancedBoost {
                id: self.unique_id(obj.get("id"), &mut seen),
                label: string(obj, "label", ""),
                description: opt_string(obj, "description"),
                weight: num(obj, "weight", 0.0, ranges::BOOST_WEIGHT),
                criteria: normalize_criteria(obj.get("criteria")),
            })
            .collect()
    }

    fn normalize_action_rules(&self, raw: &Value) -> Vec<ActionRule> {
        let Some(items) = raw.as_array() else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| ActionRule {
                id: self.unique_id(obj.get("id"), &mut seen),
                label: string(obj, "label", ""),
                description: opt_string(obj, "description"),
                action_type: action_type(obj.get("actionType")),
                categories: string_list(obj.get("categories")),
                triage_states: triage_states(obj.get("triageStates")),
                min_priority: opt_num(obj, "minPriority"),
                icon: opt_string(obj, "icon"),
                color: opt_string(obj, "color"),
                payload: obj.get("payload").filter(|v| !v.is_null()).cloned(),
            })
            .collect()
    }

    fn normalize_schedule_entries(&self, raw: Option<&Value>) -> Vec<ScheduleEntry> {
        let Some(items) = raw.and_then(Value::as_array) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| ScheduleEntry {
                id: self.unique_id(obj.get("id"), &mut seen),
                label: string(obj, "label", ""),
                preset_slug: string(obj, "presetSlug", ""),
                days_of_week: days_of_week(obj.get("daysOfWeek")),
                start_time: string(obj, "startTime", "00:00"),
                end_time: opt_string(obj, "endTime"),
                auto_apply: obj
                    .get("autoApply")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            })
            .collect()
    }

    /// Take the entry's id if present, non-empty and unused; regenerate
    /// otherwise. Entries are never dropped for id problems.
    fn unique_id(&self, raw: Option<&Value>, seen: &mut HashSet<String>) -> String {
        let candidate = raw
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let id = match candidate {
            Some(id) if !seen.contains(&id) => id,
            _ => self.ids.generate(),
        };
        seen.insert(id.clone());
        id
    }
}

fn normalize_cross_label_rules(raw: &Value) -> Vec<CrossLabelRule> {
    let Some(items) = raw.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| CrossLabelRule {
            prefix: string(obj, "prefix", ""),
            description: string(obj, "description", ""),
            weight: num(obj, "weight", 0.0, ranges::CROSS_LABEL_WEIGHT),
            case_insensitive: obj
                .get("caseInsensitive")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
        .collect()
}

fn normalize_criteria(raw: Option<&Value>) -> BoostCriteria {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return BoostCriteria::default();
    };
    BoostCriteria {
        senders: string_list(obj.get("senders")),
        domains: string_list(obj.get("domains")),
        keywords: string_list(obj.get("keywords")),
        labels: string_list(obj.get("labels")),
        categories: string_list(obj.get("categories")),
        has_attachment: obj.get("hasAttachment").and_then(Value::as_bool),
        min_priority: obj
            .get("minPriority")
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite()),
    }
}

fn num(obj: &Map<String, Value>, key: &str, default: f64, range: (f64, f64)) -> f64 {
    obj.get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(range.0, range.1))
        .unwrap_or(default)
}

fn opt_num(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn string(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn opt_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn string_list(raw: Option<&Value>) -> Vec<String> {
    raw.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn triage_states(raw: Option<&Value>) -> Vec<TriageState> {
    raw.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|s| match s {
                    "unassigned" => Some(TriageState::Unassigned),
                    "acknowledged" => Some(TriageState::Acknowledged),
                    "snoozed" => Some(TriageState::Snoozed),
                    "resolved" => Some(TriageState::Resolved),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn action_type(raw: Option<&Value>) -> ActionType {
    match raw.and_then(Value::as_str) {
        Some("playbook") => ActionType::Playbook,
        Some("create_lead") => ActionType::CreateLead,
        Some("open_url") => ActionType::OpenUrl,
        _ => ActionType::Custom,
    }
}

fn days_of_week(raw: Option<&Value>) -> Vec<u8> {
    raw.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_u64)
                .filter(|d| *d <= 6)
                .map(|d| d as u8)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn validator() -> ConfigValidator {
        ConfigValidator::new(Arc::new(SequentialIds::default()))
    }

    #[test]
    fn round_trip_is_identity() {
        let config = defaults::default_config();
        let raw = serde_json::to_value(&config).unwrap();
        let back = validator().normalize(&raw).unwrap();
        assert!(ConfigValidator::configs_equal(&config, &back));
    }

    #[test]
    fn root_must_be_an_object() {
        let v = validator();
        assert!(matches!(
            v.normalize(&serde_json::json!("not a config")),
            Err(ConfigError::NotAnObject)
        ));
        assert!(matches!(
            v.normalize(&serde_json::json!([1, 2, 3])),
            Err(ConfigError::NotAnObject)
        ));
    }

    #[test]
    fn empty_object_yields_defaults() {
        let config = validator().normalize(&serde_json::json!({})).unwrap();
        assert_eq!(config, defaults::default_config());
    }

    #[test]
    fn out_of_range_weights_clamp() {
        let raw = serde_json::json!({
            "email": {
                "categoryWeights": { "BOOKING/Offer": 150.0, "FAN/Message": -20.0 },
                "unreadBonus": 400.0
            }
        });
        let config = validator().normalize(&raw).unwrap();
        assert_eq!(config.email.category_weights["BOOKING/Offer"], 100.0);
        assert_eq!(config.email.category_weights["FAN/Message"], 0.0);
        assert_eq!(config.email.unread_bonus, 100.0);
    }

    #[test]
    fn malformed_numeric_falls_back_to_default() {
        let raw = serde_json::json!({
            "email": { "unreadBonus": "loud" },
            "time": { "overduePenaltyPerDay": null }
        });
        let config = validator().normalize(&raw).unwrap();
        let base = defaults::default_config();
        assert_eq!(config.email.unread_bonus, base.email.unread_bonus);
        assert_eq!(
            config.time.overdue_penalty_per_day,
            base.time.overdue_penalty_per_day
        );
    }

    #[test]
    fn missing_boost_ids_are_regenerated_not_dropped() {
        let raw = serde_json::json!({
            "email": {
                "advancedBoosts": [
                    { "label": "No id", "weight": 10.0 },
                    { "id": "", "label": "Blank id", "weight": 5.0 }
                ]
            }
        });
        let config = validator().normalize(&raw).unwrap();
        assert_eq!(config.email.advanced_boosts.len(), 2);
        assert_eq!(config.email.advanced_boosts[0].id, "gen-1");
        assert_eq!(config.email.advanced_boosts[1].id, "gen-2");
    }

    #[test]
    fn duplicate_ids_stay_unique_within_their_array() {
        let raw = serde_json::json!({
            "email": {
                "advancedBoosts": [
                    { "id": "dup", "label": "first" },
                    { "id": "dup", "label": "second" }
                ]
            }
        });
        let config = validator().normalize(&raw).unwrap();
        assert_eq!(config.email.advanced_boosts[0].id, "dup");
        assert_eq!(config.email.advanced_boosts[1].id, "gen-1");
    }

    #[test]
    fn non_object_rule_entries_are_dropped() {
        let raw = serde_json::json!({
            "email": {
                "crossLabelRules": [
                    { "prefix": "VIP", "weight": 500.0, "caseInsensitive": true },
                    "junk",
                    42
                ]
            }
        });
        let config = validator().normalize(&raw).unwrap();
        assert_eq!(config.email.cross_label_rules.len(), 1);
        assert_eq!(config.email.cross_label_rules[0].weight, 200.0);
    }

    #[test]
    fn unknown_triage_states_and_days_filtered() {
        let raw = serde_json::json!({
            "email": {
                "actionRules": [{
                    "id": "a1",
                    "label": "Route",
                    "actionType": "teleport",
                    "triageStates": ["unassigned", "archived"]
                }]
            },
            "scheduling": {
                "entries": [{
                    "label": "Weekend triage",
                    "presetSlug": "weekend",
                    "daysOfWeek": [0, 6, 9],
                    "startTime": "08:00"
                }]
            }
        });
        let config = validator().normalize(&raw).unwrap();
        let rule = &config.email.action_rules[0];
        assert_eq!(rule.action_type, ActionType::Custom);
        assert_eq!(rule.triage_states, vec![TriageState::Unassigned]);
        let entry = &config.scheduling.entries[0];
        assert_eq!(entry.days_of_week, vec![0, 6]);
        assert_eq!(entry.id, "gen-1");
        assert!(entry.end_time.is_none());
    }

    #[test]
    fn clone_is_isolated_from_the_source() {
        let config = defaults::default_config();
        let mut copy = ConfigValidator::clone_config(&config);
        copy.email
            .category_weights
            .insert("BOOKING/Offer".to_string(), 1.0);
        copy.email.cross_label_rules.clear();
        assert_eq!(config.email.category_weights["BOOKING/Offer"], 85.0);
        assert!(!config.email.cross_label_rules.is_empty());
        assert!(!ConfigValidator::configs_equal(&config, &copy));
    }
}
