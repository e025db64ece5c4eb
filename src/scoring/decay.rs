//! Day-count math for time-based score adjustment (pure math, no clock
//! reads — the reference instant is always supplied by the caller).

use chrono::{DateTime, Utc};

/// Signed fractional days from `from` to `to`. Positive when `to` is later.
pub fn fractional_days(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 86_400.0
}

/// Decay subtracted from a future-dated entity: `per_day × days_until`.
pub fn upcoming_decay(per_day: f64, days_until: f64) -> f64 {
    if days_until <= 0.0 {
        return 0.0;
    }
    per_day * days_until
}

/// Penalty added per day overdue (or per day an email thread sits idle).
pub fn overdue_penalty(per_day: f64, days_overdue: f64) -> f64 {
    if days_overdue <= 0.0 {
        return 0.0;
    }
    per_day * days_overdue
}
