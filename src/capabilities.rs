//! Engine capability switches.
//!
//! Which scoring features are live is decided by the workspace plan and by
//! staged rollout. The switches are passed into the scorer and matcher
//! explicitly — never read from a global — so per-test enabling/disabling
//! is one struct literal away.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-feature switches for the scoring engine. `Default` enables
/// everything; `apply_overrides` layers a name → bool map on top, ignoring
/// unknown names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineCapabilities {
    pub cross_label_rules: bool,
    pub advanced_boosts: bool,
    pub time_decay: bool,
    pub snooze_reduction: bool,
    pub manual_blend: bool,
    pub model_blend: bool,
    pub conflict_penalties: bool,
    pub action_rules: bool,
    pub scheduling: bool,
}

impl Default for EngineCapabilities {
    fn default() -> Self {
        Self {
            cross_label_rules: true,
            advanced_boosts: true,
            time_decay: true,
            snooze_reduction: true,
            manual_blend: true,
            model_blend: true,
            conflict_penalties: true,
            action_rules: true,
            scheduling: true,
        }
    }
}

impl EngineCapabilities {
    /// All switches off. Useful as a base for tests that enable one feature.
    pub fn none() -> Self {
        Self {
            cross_label_rules: false,
            advanced_boosts: false,
            time_decay: false,
            snooze_reduction: false,
            manual_blend: false,
            model_blend: false,
            conflict_penalties: false,
            action_rules: false,
            scheduling: false,
        }
    }

    /// Overlay a feature map (e.g. from workspace settings). Unknown keys
    /// are ignored so stale flags don't break older builds.
    pub fn apply_overrides(mut self, overrides: &HashMap<String, bool>) -> Self {
        for (name, enabled) in overrides {
            match name.as_str() {
                "crossLabelRules" => self.cross_label_rules = *enabled,
                "advancedBoosts" => self.advanced_boosts = *enabled,
                "timeDecay" => self.time_decay = *enabled,
                "snoozeReduction" => self.snooze_reduction = *enabled,
                "manualBlend" => self.manual_blend = *enabled,
                "modelBlend" => self.model_blend = *enabled,
                "conflictPenalties" => self.conflict_penalties = *enabled,
                "actionRules" => self.action_rules = *enabled,
                "scheduling" => self.scheduling = *enabled,
                _ => {}
            }
        }
        self
    }
}
