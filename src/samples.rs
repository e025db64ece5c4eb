//! Fixed sample entities for the settings editor's live preview.
//!
//! The preview compares baseline vs. edited vs. an optional comparison
//! preset against these snapshots, so they stay stable across releases.
//! The regression tests below pin the orderings the product relies on.

use chrono::{DateTime, TimeZone, Utc};

use crate::types::{EntityKind, EntitySnapshot, TriageState};

/// Reference instant the preview scores against.
pub fn preview_reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Unread festival offer with the contract attached.
pub fn sample_offer_email() -> EntitySnapshot {
    EntitySnapshot::new("sample-offer", EntityKind::Email)
        .with_category("BOOKING/Offer")
        .with_labels(&["BOOKING", "festival/summer"])
        .with_reference_time(preview_reference_time())
        .with_sender("anna@promoter.example", Some("Anna Duran"))
        .with_subject("Offer: Saturday headline slot")
        .with_attachments(true)
}

/// Already-acknowledged invoice, read, nothing attached.
pub fn sample_invoice_email() -> EntitySnapshot {
    EntitySnapshot::new("sample-invoice", EntityKind::Email)
        .with_category("FINANCE/Invoice")
        .with_labels(&["FINANCE"])
        .with_reference_time(preview_reference_time())
        .with_read(true)
        .with_triage_state(TriageState::Acknowledged)
        .with_sender("billing@venue.example", None)
        .with_subject("Invoice #2024-001")
}

/// Timeline item three days out with a manual priority set.
pub fn sample_timeline_item() -> EntitySnapshot {
    EntitySnapshot::new("sample-show", EntityKind::TimelineItem)
        .with_category("BOOKING/Confirmation")
        .with_reference_time(preview_reference_time() + chrono::Duration::days(3))
        .with_manual_priority(70.0)
}

/// Overdue task with no manual priority.
pub fn sample_task() -> EntitySnapshot {
    EntitySnapshot::new("sample-settle", EntityKind::Task)
        .with_category("FINANCE/Payout")
        .with_reference_time(preview_reference_time() - chrono::Duration::days(2))
}

/// The full preview set, in display order.
pub fn preview_entities() -> Vec<EntitySnapshot> {
    vec![
        sample_offer_email(),
        sample_invoice_email(),
        sample_timeline_item(),
        sample_task(),
    ]
}
