//! Schedule-window evaluation for preset scheduling.
//!
//! Entries designate which preset should be considered "active" in a
//! day/time window, evaluated in the config's IANA timezone. This module
//! is the pure predicate only — nothing here applies presets or runs on a
//! timer; automatic execution is still pending an automation worker.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

use super::model::{ScheduleEntry, SchedulingConfig};

/// Whether `entry` is active at `now`, interpreted in `timezone`.
///
/// Day-of-week uses 0 = Sunday. `end_time == None` means open-ended until
/// the end of the day. A window whose end is at or before its start wraps
/// past midnight: it also covers the early hours of the following day.
/// Malformed times or an unknown timezone evaluate inactive, never panic.
pub fn is_schedule_entry_active(entry: &ScheduleEntry, now: DateTime<Utc>, timezone: &str) -> bool {
    let Ok(tz) = timezone.parse::<Tz>() else {
        log::warn!("Unknown schedule timezone '{}', treating entries as inactive", timezone);
        return false;
    };
    let Some(start) = parse_hhmm(&entry.start_time) else {
        return false;
    };
    let end = match entry.end_time.as_deref() {
        Some(raw) => match parse_hhmm(raw) {
            Some(end) => Some(end),
            None => return false,
        },
        None => None,
    };

    let local = now.with_timezone(&tz);
    let day = local.weekday().num_days_from_sunday() as u8;
    let minute_of_day = local.hour() * 60 + local.minute();
    let day_matches = entry.days_of_week.contains(&day);

    match end {
        None => day_matches && minute_of_day >= start,
        Some(end) if end > start => day_matches && minute_of_day >= start && minute_of_day < end,
        Some(end) => {
            // Wrapping window: [start, midnight) on a listed day, plus
            // [midnight, end) on the day after a listed day.
            let prev_day = if day == 0 { 6 } else { day - 1 };
            (day_matches && minute_of_day >= start)
                || (entry.days_of_week.contains(&prev_day) && minute_of_day < end)
        }
    }
}

/// First auto-apply entry active at `now`, in array order.
pub fn active_entry(scheduling: &SchedulingConfig, now: DateTime<Utc>) -> Option<&ScheduleEntry> {
    scheduling
        .entries
        .iter()
        .filter(|e| e.auto_apply)
        .find(|e| is_schedule_entry_active(e, now, &scheduling.timezone))
}

fn parse_hhmm(raw: &str) -> Option<u32> {
    let (h, m) = raw.split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}
