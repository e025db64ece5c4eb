//! The priority scorer.
//!
//! `compute` runs a fixed sequence of steps over one entity snapshot and
//! one config. Each step that changes the score appends one signed
//! breakdown component, in the order applied, and the total is the
//! running sum after all steps — no implicit clamping (zone bucketing
//! reads the raw total). Given identical inputs the result is identical:
//! no randomness, no clock reads beyond the supplied reference instant.

use chrono::{DateTime, Utc};

use crate::capabilities::EngineCapabilities;
use crate::config::model::PriorityConfig;
use crate::types::{
    ConflictSeverity, DependencyKind, EntityKind, EntitySnapshot, ScoreComponent, ScoreResult,
};

use super::{boosts, decay, rules};

#[derive(Debug, Clone, Default)]
pub struct PriorityScorer {
    capabilities: EngineCapabilities,
}

impl PriorityScorer {
    pub fn new(capabilities: EngineCapabilities) -> Self {
        Self { capabilities }
    }

    /// Score one entity against one config at the supplied instant.
    pub fn compute(
        &self,
        entity: &EntitySnapshot,
        config: &PriorityConfig,
        now: DateTime<Utc>,
    ) -> ScoreResult {
        let caps = &self.capabilities;
        let mut components: Vec<ScoreComponent> = Vec::new();
        let mut total = 0.0_f64;

        // 1. Base weight — category table, or the undated value for
        // dateless timeline/task items.
        let (base_label, base) = base_weight(entity, config);
        push(&mut components, base_label, base);
        total += base;

        // 2. Cross-label boosts.
        if caps.cross_label_rules {
            let matched = rules::matching_rules(&entity.labels, &config.email.cross_label_rules);
            let sum: f64 = matched.iter().map(|r| r.weight).sum();
            push(&mut components, "Label rules".to_string(), sum);
            total += sum;
        }

        // 3. Advanced boosts, in rule-array order. minPriority criteria
        // read the running total, so each applying boost lands before the
        // next is evaluated.
        if caps.advanced_boosts {
            for boost in &config.email.advanced_boosts {
                if boosts::boost_applies(boost, entity, total) {
                    push(&mut components, boost.label.clone(), boost.weight);
                    total += boost.weight;
                }
            }
        }

        // 4. Time adjustment.
        if caps.time_decay {
            if let Some(reference) = entity.reference_time {
                let days_until = decay::fractional_days(now, reference);
                if days_until > 0.0 {
                    let value = -decay::upcoming_decay(config.time.upcoming_decay_per_day, days_until);
                    push(&mut components, "Upcoming".to_string(), value);
                    total += value;
                } else {
                    let days_over = -days_until;
                    let mut value =
                        decay::overdue_penalty(config.time.overdue_penalty_per_day, days_over);
                    let label = if entity.kind == EntityKind::Email {
                        // A long-idle unread thread gets its idle delta
                        // multiplied up so it resurfaces.
                        if !entity.is_read
                            && days_over > config.email.idle_age.long_window_days
                        {
                            value *= config.email.idle_age.long_window_multiplier;
                        }
                        "Idle thread"
                    } else {
                        "Overdue"
                    };
                    push(&mut components, label.to_string(), value);
                    total += value;
                }
            }
        }

        // 5. Unread bonus.
        if entity.kind == EntityKind::Email && !entity.is_read {
            push(
                &mut components,
                "Unread".to_string(),
                config.email.unread_bonus,
            );
            total += config.email.unread_bonus;
        }

        // 6. Snooze reduction — multiplicative, recorded as its delta.
        if caps.snooze_reduction
            && entity.triage_state == crate::types::TriageState::Snoozed
            && entity.snoozed_until.map(|u| u > now).unwrap_or(false)
        {
            let reduced = total * (1.0 - config.email.snooze_age_reduction);
            push(&mut components, "Snoozed".to_string(), reduced - total);
            total = reduced;
        }

        // Model blend — emails only; the classifier's estimate is folded
        // in the same way a manual priority is for timeline items.
        if caps.model_blend && entity.kind == EntityKind::Email {
            if let Some(model) = entity.model_priority {
                let w = config.email.model_priority_weight;
                if w > 0.0 {
                    let blended = total * (1.0 - w) + model * w;
                    push(&mut components, "Model estimate".to_string(), blended - total);
                    total = blended;
                }
            }
        }

        // 7. Manual blend — timeline/task only.
        if caps.manual_blend {
            let weight = match entity.kind {
                EntityKind::TimelineItem => Some(config.timeline.manual_priority_weight),
                EntityKind::Task => Some(config.tasks.manual_priority_weight),
                EntityKind::Email => None,
            };
            if let (Some(w), Some(manual)) = (weight, entity.manual_priority) {
                if w > 0.0 {
                    let blended = total * (1.0 - w) + manual * w;
                    push(&mut components, "Manual priority".to_string(), blended - total);
                    total = blended;
                }
            }
        }

        // 8. Conflict and dependency penalties — timeline only.
        if caps.conflict_penalties && entity.kind == EntityKind::TimelineItem {
            let conflict_sum: f64 = entity
                .conflicts
                .iter()
                .map(|severity| match severity {
                    ConflictSeverity::Default => config.timeline.conflict_penalties.default,
                    ConflictSeverity::Error => config.timeline.conflict_penalties.error,
                })
                .sum();
            push(
                &mut components,
                "Scheduling conflicts".to_string(),
                -conflict_sum,
            );
            total -= conflict_sum;

            let dependency_sum: f64 = entity
                .blocking_dependencies
                .iter()
                .map(|kind| match kind {
                    DependencyKind::FinishToStart => {
                        config.timeline.dependency_penalties.finish_to_start
                    }
                    DependencyKind::Other => config.timeline.dependency_penalties.other,
                })
                .sum();
            push(
                &mut components,
                "Blocked by dependencies".to_string(),
                -dependency_sum,
            );
            total -= dependency_sum;
        }

        ScoreResult { total, components }
    }
}

/// Steps that leave the score unchanged contribute no component.
fn push(components: &mut Vec<ScoreComponent>, label: String, value: f64) {
    if value != 0.0 {
        components.push(ScoreComponent { label, value });
    }
}

fn base_weight(entity: &EntitySnapshot, config: &PriorityConfig) -> (String, f64) {
    if entity.reference_time.is_none() {
        match entity.kind {
            EntityKind::TimelineItem => {
                return ("Undated".to_string(), config.timeline.undated_value)
            }
            EntityKind::Task => {
                return ("No due date".to_string(), config.tasks.no_due_date_value)
            }
            EntityKind::Email => {}
        }
    }
    match entity
        .category
        .as_deref()
        .and_then(|c| config.email.category_weights.get(c))
    {
        Some(weight) => (
            format!("Category: {}", entity.category.as_deref().unwrap_or_default()),
            *weight,
        ),
        None => (
            "Category (default)".to_string(),
            config.email.default_category_weight,
        ),
    }
}

/// An entity paired with its score, for grouped views.
#[derive(Debug, Clone)]
pub struct RankedEntity {
    pub entity: EntitySnapshot,
    pub score: ScoreResult,
}

/// Sort for grouped views: total descending, then reference time
/// descending (most recent wins ties), then id for full determinism.
pub fn sort_ranked(items: &mut [RankedEntity]) {
    items.sort_by(|a, b| {
        b.score
            .total
            .partial_cmp(&a.score.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.entity.reference_time.cmp(&a.entity.reference_time))
            .then_with(|| a.entity.id.cmp(&b.entity.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{AdvancedBoost, BoostCriteria};
    use crate::types::TriageState;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 3, 12, 0, 0).unwrap()
    }

    fn scorer() -> PriorityScorer {
        PriorityScorer::default()
    }

    fn offer_email() -> EntitySnapshot {
        EntitySnapshot::new("e-offer", EntityKind::Email)
            .with_category("BOOKING/Offer")
            .with_reference_time(now())
            .with_sender("anna@promoter.example", Some("Anna Duran"))
            .with_subject("Offer: Saturday headline slot")
    }

    #[test]
    fn compute_is_deterministic() {
        let config = PriorityConfig::default();
        let entity = offer_email().with_labels(&["VIP/agent"]).with_attachments(true);
        let a = scorer().compute(&entity, &config, now());
        let b = scorer().compute(&entity, &config, now());
        assert_eq!(a, b);
    }

    #[test]
    fn total_is_the_sum_of_components() {
        let config = PriorityConfig::default();
        let entity = offer_email().with_labels(&["VIP/agent"]);
        let result = scorer().compute(&entity, &config, now());
        let sum: f64 = result.components.iter().map(|c| c.value).sum();
        assert!((result.total - sum).abs() < 1e-9);
        assert!(!result.components.is_empty());
    }

    #[test]
    fn unread_toggle_moves_total_by_exactly_the_bonus() {
        let config = PriorityConfig::default();
        let read = offer_email().with_read(true);
        let unread = offer_email().with_read(false);
        let read_score = scorer().compute(&read, &config, now());
        let unread_score = scorer().compute(&unread, &config, now());
        assert!(
            (unread_score.total - read_score.total - config.email.unread_bonus).abs() < 1e-9
        );
    }

    #[test]
    fn missing_category_falls_into_the_default_bucket() {
        let config = PriorityConfig::default();
        let entity = EntitySnapshot::new("e-x", EntityKind::Email)
            .with_reference_time(now())
            .with_read(true);
        let result = scorer().compute(&entity, &config, now());
        assert_eq!(result.total, config.email.default_category_weight);
        assert_eq!(result.components[0].label, "Category (default)");
    }

    #[test]
    fn snoozed_scores_at_most_the_unsnoozed_total() {
        let config = PriorityConfig::default();
        let plain = offer_email().with_read(true);
        let snoozed = offer_email()
            .with_read(true)
            .with_triage_state(TriageState::Snoozed)
            .with_snoozed_until(now() + chrono::Duration::days(2));
        let plain_score = scorer().compute(&plain, &config, now());
        let snoozed_score = scorer().compute(&snoozed, &config, now());
        assert!(snoozed_score.total <= plain_score.total);
        assert!(snoozed_score
            .components
            .iter()
            .any(|c| c.label == "Snoozed" && c.value < 0.0));
    }

    #[test]
    fn elapsed_snooze_has_no_effect() {
        let config = PriorityConfig::default();
        let expired = offer_email()
            .with_read(true)
            .with_triage_state(TriageState::Snoozed)
            .with_snoozed_until(now() - chrono::Duration::hours(1));
        let plain = offer_email().with_read(true);
        assert_eq!(
            scorer().compute(&expired, &config, now()).total,
            scorer().compute(&plain, &config, now()).total
        );
    }

    #[test]
    fn future_dated_task_decays_per_day() {
        let config = PriorityConfig::default();
        let task = EntitySnapshot::new("t-1", EntityKind::Task)
            .with_category("LOGISTICS/Travel")
            .with_reference_time(now() + chrono::Duration::days(4));
        let result = scorer().compute(&task, &config, now());
        let expected =
            config.email.category_weights["LOGISTICS/Travel"] - 4.0 * config.time.upcoming_decay_per_day;
        assert!((result.total - expected).abs() < 1e-9);
        assert!(result.components.iter().any(|c| c.label == "Upcoming"));
    }

    #[test]
    fn overdue_task_gains_penalty_per_day() {
        let config = PriorityConfig::default();
        let task = EntitySnapshot::new("t-2", EntityKind::Task)
            .with_category("LOGISTICS/Travel")
            .with_reference_time(now() - chrono::Duration::days(3));
        let result = scorer().compute(&task, &config, now());
        let expected =
            config.email.category_weights["LOGISTICS/Travel"] + 3.0 * config.time.overdue_penalty_per_day;
        assert!((result.total - expected).abs() < 1e-9);
        assert!(result.components.iter().any(|c| c.label == "Overdue"));
    }

    #[test]
    fn long_idle_unread_email_gets_the_multiplier() {
        let config = PriorityConfig::default();
        let age = chrono::Duration::days(10);
        let idle_unread = offer_email().with_reference_time(now() - age);
        let idle_read = offer_email().with_reference_time(now() - age).with_read(true);

        let unread_idle = scorer()
            .compute(&idle_unread, &config, now())
            .components
            .into_iter()
            .find(|c| c.label == "Idle thread")
            .expect("idle component");
        let read_idle = scorer()
            .compute(&idle_read, &config, now())
            .components
            .into_iter()
            .find(|c| c.label == "Idle thread")
            .expect("idle component");

        let expected_base = 10.0 * config.time.overdue_penalty_per_day;
        assert!((read_idle.value - expected_base).abs() < 1e-9);
        assert!(
            (unread_idle.value
                - expected_base * config.email.idle_age.long_window_multiplier)
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn manual_weight_zero_ignores_manual_priority() {
        let config = PriorityConfig::default().with_tasks_manual_weight(0.0);
        let with_manual = EntitySnapshot::new("t-3", EntityKind::Task)
            .with_category("INTERNAL/Team")
            .with_reference_time(now())
            .with_manual_priority(99.0);
        let without = EntitySnapshot::new("t-3", EntityKind::Task)
            .with_category("INTERNAL/Team")
            .with_reference_time(now());
        assert_eq!(
            scorer().compute(&with_manual, &config, now()).total,
            scorer().compute(&without, &config, now()).total
        );
    }

    #[test]
    fn manual_weight_one_takes_manual_priority_verbatim() {
        let config = PriorityConfig::default().with_timeline_manual_weight(1.0);
        let item = EntitySnapshot::new("tl-1", EntityKind::TimelineItem)
            .with_category("BOOKING/Confirmation")
            .with_reference_time(now())
            .with_manual_priority(72.0);
        let result = scorer().compute(&item, &config, now());
        assert!((result.total - 72.0).abs() < 1e-9);
    }

    #[test]
    fn undated_items_use_the_undated_values() {
        let config = PriorityConfig::default();
        let item = EntitySnapshot::new("tl-2", EntityKind::TimelineItem);
        let task = EntitySnapshot::new("t-4", EntityKind::Task);
        assert_eq!(
            scorer().compute(&item, &config, now()).total,
            config.timeline.undated_value
        );
        assert_eq!(
            scorer().compute(&task, &config, now()).total,
            config.tasks.no_due_date_value
        );
    }

    #[test]
    fn conflicts_and_dependencies_subtract_per_instance() {
        let config = PriorityConfig::default();
        let item = EntitySnapshot::new("tl-3", EntityKind::TimelineItem)
            .with_category("BOOKING/Confirmation")
            .with_reference_time(now())
            .with_conflicts(vec![ConflictSeverity::Default, ConflictSeverity::Error])
            .with_blocking_dependencies(vec![DependencyKind::FinishToStart, DependencyKind::Other]);
        let result = scorer().compute(&item, &config, now());
        let expected = config.email.category_weights["BOOKING/Confirmation"]
            - config.timeline.conflict_penalties.default
            - config.timeline.conflict_penalties.error
            - config.timeline.dependency_penalties.finish_to_start
            - config.timeline.dependency_penalties.other;
        assert!((result.total - expected).abs() < 1e-9);
    }

    #[test]
    fn min_priority_boost_sees_earlier_boosts() {
        // First boost lifts the running score over the second's threshold.
        let base = PriorityConfig::default();
        let config = base.with_advanced_boosts(vec![
            AdvancedBoost {
                id: "b-lift".to_string(),
                label: "Lift".to_string(),
                description: None,
                weight: 20.0,
                criteria: BoostCriteria::default(),
            },
            AdvancedBoost {
                id: "b-top".to_string(),
                label: "Already hot".to_string(),
                description: None,
                weight: 10.0,
                criteria: BoostCriteria {
                    min_priority: Some(100.0),
                    ..BoostCriteria::default()
                },
            },
        ]);
        // Base 85 + unread 15 = 100 only after the first boost pushes past:
        // 85 + 20 = 105 ≥ 100, so the second boost applies too.
        let entity = offer_email().with_read(true);
        let result = scorer().compute(&entity, &config, now());
        assert!(result.components.iter().any(|c| c.label == "Already hot"));
        assert!((result.total - (85.0 + 20.0 + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn model_blend_pulls_toward_the_model_estimate() {
        let config = PriorityConfig::default();
        let entity = offer_email().with_read(true).with_model_priority(20.0);
        let plain = offer_email().with_read(true);
        let blended = scorer().compute(&entity, &config, now());
        let unblended = scorer().compute(&plain, &config, now());
        let w = config.email.model_priority_weight;
        let expected = unblended.total * (1.0 - w) + 20.0 * w;
        assert!((blended.total - expected).abs() < 1e-9);
    }

    #[test]
    fn capabilities_gate_their_steps() {
        let config = PriorityConfig::default();
        let entity = offer_email()
            .with_labels(&["VIP/agent"])
            .with_attachments(true)
            .with_read(true);

        let mut caps = EngineCapabilities::default();
        caps.cross_label_rules = false;
        caps.advanced_boosts = false;
        let gated = PriorityScorer::new(caps).compute(&entity, &config, now());
        assert!(!gated.components.iter().any(|c| c.label == "Label rules"));
        assert_eq!(gated.total, config.email.category_weights["BOOKING/Offer"]);

        let full = scorer().compute(&entity, &config, now());
        assert!(full.components.iter().any(|c| c.label == "Label rules"));
    }

    #[test]
    fn ranking_sorts_by_total_then_recency_then_id() {
        let t0 = now() - chrono::Duration::hours(2);
        let t1 = now() - chrono::Duration::hours(1);
        let mut items = vec![
            RankedEntity {
                entity: EntitySnapshot::new("a", EntityKind::Email).with_reference_time(t0),
                score: ScoreResult { total: 50.0, components: vec![] },
            },
            RankedEntity {
                entity: EntitySnapshot::new("b", EntityKind::Email).with_reference_time(t1),
                score: ScoreResult { total: 50.0, components: vec![] },
            },
            RankedEntity {
                entity: EntitySnapshot::new("c", EntityKind::Email).with_reference_time(t0),
                score: ScoreResult { total: 80.0, components: vec![] },
            },
        ];
        sort_ranked(&mut items);
        let order: Vec<&str> = items.iter().map(|i| i.entity.id.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }
}
