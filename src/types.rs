use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of entity the scorer is looking at. Determines which reference time
/// and which blend weight apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Email,
    TimelineItem,
    Task,
}

/// Triage lifecycle of an inbox entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageState {
    Unassigned,
    Acknowledged,
    Snoozed,
    Resolved,
}

impl TriageState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageState::Unassigned => "unassigned",
            TriageState::Acknowledged => "acknowledged",
            TriageState::Snoozed => "snoozed",
            TriageState::Resolved => "resolved",
        }
    }
}

/// Severity of a detected scheduling conflict on a timeline item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictSeverity {
    Default,
    Error,
}

/// Kind of blocking predecessor on a timeline item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    FinishToStart,
    Other,
}

/// Snapshot of an entity as the scorer sees it. Built by the inbox,
/// timeline and task call sites; the scorer never reaches back into
/// storage or the clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    pub id: String,
    pub kind: EntityKind,
    /// Classifier-assigned category label, e.g. "BOOKING/Offer". Missing
    /// categories fall into the default-weight bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    /// `receivedAt` for emails, `startsAt`/`dueAt` for timeline items and
    /// tasks. Undated entities score from the undated/no-due-date value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_read: bool,
    pub triage_state: TriageState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snoozed_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub has_attachments: bool,
    /// AI-estimated priority (0–100) from the external classifier, blended
    /// in via `email.modelPriorityWeight`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_priority: Option<f64>,
    /// Human-entered priority (0–100), timeline/task only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_priority: Option<f64>,
    /// Detected scheduling conflicts, timeline only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<ConflictSeverity>,
    /// Blocking predecessors, timeline only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocking_dependencies: Vec<DependencyKind>,
}

impl EntitySnapshot {
    /// Bare snapshot of the given kind. Call sites layer fields on with the
    /// `with_*` builders.
    pub fn new(id: &str, kind: EntityKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            category: None,
            labels: Vec::new(),
            reference_time: None,
            is_read: false,
            triage_state: TriageState::Unassigned,
            snoozed_until: None,
            from_email: None,
            from_name: None,
            subject: None,
            has_attachments: false,
            model_priority: None,
            manual_priority: None,
            conflicts: Vec::new(),
            blocking_dependencies: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_reference_time(mut self, t: DateTime<Utc>) -> Self {
        self.reference_time = Some(t);
        self
    }

    pub fn with_read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    pub fn with_triage_state(mut self, state: TriageState) -> Self {
        self.triage_state = state;
        self
    }

    pub fn with_snoozed_until(mut self, until: DateTime<Utc>) -> Self {
        self.snoozed_until = Some(until);
        self
    }

    pub fn with_sender(mut self, email: &str, name: Option<&str>) -> Self {
        self.from_email = Some(email.to_string());
        self.from_name = name.map(|n| n.to_string());
        self
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    pub fn with_attachments(mut self, has: bool) -> Self {
        self.has_attachments = has;
        self
    }

    pub fn with_model_priority(mut self, priority: f64) -> Self {
        self.model_priority = Some(priority);
        self
    }

    pub fn with_manual_priority(mut self, priority: f64) -> Self {
        self.manual_priority = Some(priority);
        self
    }

    pub fn with_conflicts(mut self, conflicts: Vec<ConflictSeverity>) -> Self {
        self.conflicts = conflicts;
        self
    }

    pub fn with_blocking_dependencies(mut self, deps: Vec<DependencyKind>) -> Self {
        self.blocking_dependencies = deps;
        self
    }
}

/// One labeled, signed contribution to a priority score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub label: String,
    pub value: f64,
}

/// Result of scoring one entity: the running sum after all steps plus the
/// breakdown in the order the steps applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub total: f64,
    pub components: Vec<ScoreComponent>,
}

/// Display zone for a scored entity. Snoozed and resolved are their own
/// zones and override the numeric bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityZone {
    Critical,
    High,
    Medium,
    Low,
    Snoozed,
    Resolved,
}

/// Zone thresholds read the raw total — no clamp is applied first, so a
/// heavily boosted entity above 100 still buckets as critical.
pub fn zone_for(total: f64, triage_state: TriageState) -> PriorityZone {
    match triage_state {
        TriageState::Snoozed => PriorityZone::Snoozed,
        TriageState::Resolved => PriorityZone::Resolved,
        _ => {
            if total >= 80.0 {
                PriorityZone::Critical
            } else if total >= 60.0 {
                PriorityZone::High
            } else if total >= 40.0 {
                PriorityZone::Medium
            } else {
                PriorityZone::Low
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_thresholds() {
        assert_eq!(zone_for(80.0, TriageState::Unassigned), PriorityZone::Critical);
        assert_eq!(zone_for(79.9, TriageState::Unassigned), PriorityZone::High);
        assert_eq!(zone_for(60.0, TriageState::Acknowledged), PriorityZone::High);
        assert_eq!(zone_for(40.0, TriageState::Unassigned), PriorityZone::Medium);
        assert_eq!(zone_for(39.9, TriageState::Unassigned), PriorityZone::Low);
        assert_eq!(zone_for(-12.0, TriageState::Unassigned), PriorityZone::Low);
    }

    #[test]
    fn zone_unclamped_above_hundred() {
        assert_eq!(zone_for(145.0, TriageState::Unassigned), PriorityZone::Critical);
    }

    #[test]
    fn snoozed_and_resolved_override_numeric_bucket() {
        assert_eq!(zone_for(95.0, TriageState::Snoozed), PriorityZone::Snoozed);
        assert_eq!(zone_for(95.0, TriageState::Resolved), PriorityZone::Resolved);
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let snap = EntitySnapshot::new("e-1", EntityKind::Email)
            .with_category("BOOKING/Offer")
            .with_labels(&["BOOKING", "festival"])
            .with_sender("promoter@venue.example", Some("Jo Venue"))
            .with_subject("Offer: summer slot")
            .with_attachments(true);
        let json = serde_json::to_string(&snap).unwrap();
        let back: EntitySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.category.as_deref(), Some("BOOKING/Offer"));
        assert_eq!(back.labels.len(), 2);
        assert!(back.has_attachments);
    }
}
