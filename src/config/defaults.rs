//! Built-in default configuration.
//!
//! This is the config a fresh workspace starts from, the fallback when a
//! load fails, and the source of truth for per-category reset. Category
//! labels follow the classifier taxonomy (`AREA/Subtype`).

use std::collections::HashMap;

use crate::types::TriageState;

use super::model::{
    ActionRule, ActionType, AdvancedBoost, BoostCriteria, ConflictPenalties, CrossLabelRule,
    DependencyPenalties, EmailConfig, IdleAgeConfig, PriorityConfig, SchedulingConfig, TasksConfig,
    TimeConfig, TimelineConfig,
};

/// Default base weight per classifier category.
pub const DEFAULT_CATEGORY_WEIGHTS: &[(&str, f64)] = &[
    ("BOOKING/Offer", 85.0),
    ("BOOKING/Cancellation", 80.0),
    ("BOOKING/Confirmation", 70.0),
    ("LEGAL/Contract", 75.0),
    ("FINANCE/Invoice", 70.0),
    ("FINANCE/Payout", 60.0),
    ("PRESS/Request", 65.0),
    ("LOGISTICS/Travel", 55.0),
    ("LOGISTICS/Rider", 50.0),
    ("INTERNAL/Team", 45.0),
    ("FAN/Message", 25.0),
    ("PROMO/Newsletter", 15.0),
];

/// The built-in default `PriorityConfig`.
pub fn default_config() -> PriorityConfig {
    PriorityConfig {
        email: EmailConfig {
            category_weights: default_category_weights(),
            default_category_weight: 40.0,
            unread_bonus: 15.0,
            model_priority_weight: 0.3,
            snooze_age_reduction: 0.6,
            idle_age: IdleAgeConfig {
                long_window_days: 7.0,
                long_window_multiplier: 1.5,
            },
            cross_label_rules: default_cross_label_rules(),
            advanced_boosts: default_advanced_boosts(),
            action_rules: default_action_rules(),
        },
        time: TimeConfig {
            upcoming_decay_per_day: 2.0,
            overdue_penalty_per_day: 5.0,
        },
        timeline: TimelineConfig {
            manual_priority_weight: 0.5,
            undated_value: 35.0,
            conflict_penalties: ConflictPenalties {
                default: 10.0,
                error: 25.0,
            },
            dependency_penalties: DependencyPenalties {
                finish_to_start: 15.0,
                other: 8.0,
            },
        },
        tasks: TasksConfig {
            manual_priority_weight: 0.6,
            no_due_date_value: 30.0,
        },
        scheduling: SchedulingConfig {
            timezone: "UTC".to_string(),
            entries: Vec::new(),
        },
    }
}

pub fn default_category_weights() -> HashMap<String, f64> {
    DEFAULT_CATEGORY_WEIGHTS
        .iter()
        .map(|(label, weight)| (label.to_string(), *weight))
        .collect()
}

fn default_cross_label_rules() -> Vec<CrossLabelRule> {
    vec![CrossLabelRule {
        prefix: "VIP".to_string(),
        description: "Messages labeled for priority contacts".to_string(),
        weight: 25.0,
        case_insensitive: true,
    }]
}

fn default_advanced_boosts() -> Vec<AdvancedBoost> {
    vec![AdvancedBoost {
        id: "boost-contract-attachment".to_string(),
        label: "Contract attached".to_string(),
        description: Some("Legal mail carrying a document needs a signature pass".to_string()),
        weight: 20.0,
        criteria: BoostCriteria {
            categories: vec!["LEGAL/Contract".to_string()],
            has_attachment: Some(true),
            ..BoostCriteria::default()
        },
    }]
}

fn default_action_rules() -> Vec<ActionRule> {
    vec![
        ActionRule {
            id: "action-booking-playbook".to_string(),
            label: "Open booking playbook".to_string(),
            description: Some("Walk the offer through the standard response flow".to_string()),
            action_type: ActionType::Playbook,
            categories: vec!["BOOKING/Offer".to_string()],
            triage_states: vec![TriageState::Unassigned, TriageState::Acknowledged],
            min_priority: Some(60.0),
            icon: Some("calendar".to_string()),
            color: None,
            payload: Some(serde_json::json!({ "playbook": "booking-offer" })),
        },
        ActionRule {
            id: "action-escalate".to_string(),
            label: "Escalate".to_string(),
            description: None,
            action_type: ActionType::Custom,
            categories: Vec::new(),
            triage_states: Vec::new(),
            min_priority: Some(80.0),
            icon: Some("flag".to_string()),
            color: Some("red".to_string()),
            payload: None,
        },
    ]
}
