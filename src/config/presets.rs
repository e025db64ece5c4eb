//! Named preset configurations.
//!
//! Presets are full-substitution documents embedded at compile time.
//! Applying one **replaces the entire config** — never a merge. A preset
//! that omits a section resets that section to the preset's definition
//! (its omission means "built-in defaults"), not to the user's prior
//! values. This is the correctness-sensitive contract callers depend on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

use super::defaults;
use super::model::PriorityConfig;
use super::validate::ConfigValidator;

/// Embedded preset documents, in display order.
const EMBEDDED: &[(&str, &str)] = &[
    ("booking-rush", include_str!("../../presets/booking-rush.json")),
    ("deep-work", include_str!("../../presets/deep-work.json")),
    (
        "settlement-week",
        include_str!("../../presets/settlement-week.json"),
    ),
];

/// A preset as embedded: summary metadata plus the raw config payload,
/// normalized on apply.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetDocument {
    pub slug: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub recommended_scenarios: Vec<String>,
    #[serde(default)]
    pub adjustments: Vec<String>,
    pub config: Value,
}

/// Listing shape for the preset picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSummary {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub recommended_scenarios: Vec<String>,
    pub adjustments: Vec<String>,
}

#[derive(Default)]
pub struct PresetManager {
    validator: ConfigValidator,
}

impl PresetManager {
    pub fn new(validator: ConfigValidator) -> Self {
        Self { validator }
    }

    /// Load an embedded preset document by slug.
    pub fn get(slug: &str) -> Result<PresetDocument, ConfigError> {
        let json = EMBEDDED
            .iter()
            .find(|(s, _)| *s == slug)
            .map(|(_, json)| *json)
            .ok_or_else(|| ConfigError::UnknownPreset(slug.to_string()))?;
        serde_json::from_str(json)
            .map_err(|e| ConfigError::Store(format!("embedded preset '{}' is invalid: {}", slug, e)))
    }

    /// List available presets for the picker.
    pub fn available() -> Vec<PresetSummary> {
        EMBEDDED
            .iter()
            .filter_map(|(slug, json)| {
                let doc: PresetDocument = serde_json::from_str(json).ok()?;
                debug_assert_eq!(doc.slug, *slug);
                Some(PresetSummary {
                    slug: doc.slug,
                    name: doc.name,
                    description: doc.description,
                    recommended_scenarios: doc.recommended_scenarios,
                    adjustments: doc.adjustments,
                })
            })
            .collect()
    }

    /// Resolve a preset into a complete config. Wholesale substitution:
    /// the caller replaces its current config with the result.
    pub fn apply(&self, slug: &str) -> Result<PriorityConfig, ConfigError> {
        let doc = Self::get(slug)?;
        self.validator.normalize(&doc.config)
    }

    /// Restore all-or-named category weights (and nothing else) to the
    /// built-in defaults. Returns the new config and the list of
    /// categories whose effective weight actually changed.
    pub fn reset(
        config: &PriorityConfig,
        categories: Option<&[String]>,
    ) -> (PriorityConfig, Vec<String>) {
        let defaults = defaults::default_category_weights();
        let mut next = config.clone();
        let mut changed = Vec::new();

        match categories {
            None => {
                // Full reset: the default table replaces the whole map,
                // dropping any custom categories.
                let mut touched: Vec<String> = Vec::new();
                for (label, weight) in &defaults {
                    if next.email.category_weights.get(label) != Some(weight) {
                        touched.push(label.clone());
                    }
                }
                for label in next.email.category_weights.keys() {
                    if !defaults.contains_key(label) {
                        touched.push(label.clone());
                    }
                }
                next.email.category_weights = defaults;
                touched.sort();
                changed = touched;
            }
            Some(named) => {
                for label in named {
                    match defaults.get(label) {
                        Some(weight) => {
                            if next.email.category_weights.get(label) != Some(weight) {
                                next.email
                                    .category_weights
                                    .insert(label.clone(), *weight);
                                changed.push(label.clone());
                            }
                        }
                        None => {
                            // Custom category with no default: resetting it
                            // removes it, falling back to the default bucket.
                            if next.email.category_weights.remove(label).is_some() {
                                changed.push(label.clone());
                            }
                        }
                    }
                }
            }
        }

        (next, changed)
    }
}
