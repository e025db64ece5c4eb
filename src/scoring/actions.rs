//! Action-rule matching: which UI-triggerable actions apply to a scored
//! entity.

use crate::capabilities::EngineCapabilities;
use crate::config::model::{ActionRule, PriorityConfig};
use crate::types::EntitySnapshot;

#[derive(Debug, Clone, Default)]
pub struct ActionRuleMatcher {
    capabilities: EngineCapabilities,
}

impl ActionRuleMatcher {
    pub fn new(capabilities: EngineCapabilities) -> Self {
        Self { capabilities }
    }

    /// Rules that apply to `entity` at `score`, preserving config array
    /// order. An empty result is valid — there are no error conditions.
    pub fn select_for<'a>(
        &self,
        entity: &EntitySnapshot,
        score: f64,
        config: &'a PriorityConfig,
    ) -> Vec<&'a ActionRule> {
        if !self.capabilities.action_rules {
            return Vec::new();
        }
        config
            .email
            .action_rules
            .iter()
            .filter(|rule| rule_applies(rule, entity, score))
            .collect()
    }
}

fn rule_applies(rule: &ActionRule, entity: &EntitySnapshot, score: f64) -> bool {
    if let Some(min) = rule.min_priority {
        if score < min {
            return false;
        }
    }
    if !rule.categories.is_empty() {
        let matches = entity
            .category
            .as_deref()
            .map(|c| rule.categories.iter().any(|rc| rc.eq_ignore_ascii_case(c)))
            .unwrap_or(false);
        if !matches {
            return false;
        }
    }
    if !rule.triage_states.is_empty() && !rule.triage_states.contains(&entity.triage_state) {
        return false;
    }
    true
}
