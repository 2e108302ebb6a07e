use std::collections::HashSet;

use chrono::{Datelike, Duration, Timelike, Weekday};
use tracing::{info, warn};

use crate::limits::*;
use crate::model::*;

use super::EngineError;

// ── Availability Algorithm ────────────────────────────────────────

/// Epoch seconds of every slot start that is already taken.
///
/// Only `starts_at` is used as the key, but a record whose `ends_at` does not
/// parse is skipped too. Malformed records are logged and dropped so one bad
/// historical entry cannot fail the whole query.
pub fn busy_lookup(appointments: &[Appointment]) -> HashSet<i64> {
    let mut busy = HashSet::with_capacity(appointments.len());
    for appt in appointments {
        let start = match parse_timestamp(&appt.starts_at) {
            Ok(t) => t,
            Err(e) => {
                warn!(id = appt.id, starts_at = %appt.starts_at, "skipping appointment: {e}");
                metrics::counter!(crate::observability::MALFORMED_RECORDS_TOTAL).increment(1);
                continue;
            }
        };
        if let Err(e) = parse_timestamp(&appt.ends_at) {
            warn!(id = appt.id, ends_at = %appt.ends_at, "skipping appointment: {e}");
            metrics::counter!(crate::observability::MALFORMED_RECORDS_TOTAL).increment(1);
            continue;
        }
        busy.insert(start.timestamp());
    }
    busy
}

/// Parse and grid-check a requested window. Nothing is rounded.
pub fn parse_window(starts_at: &str, ends_at: &str) -> Result<(Timestamp, Timestamp), EngineError> {
    let start = parse_timestamp(starts_at)
        .map_err(|e| EngineError::Validation(format!("error parsing starts_at time: {e}")))?;
    let end = parse_timestamp(ends_at)
        .map_err(|e| EngineError::Validation(format!("error parsing ends_at time: {e}")))?;
    if !is_on_grid(&start) {
        return Err(EngineError::Validation(
            "starts_at time minutes must be :00 or :30".into(),
        ));
    }
    if !is_on_grid(&end) {
        return Err(EngineError::Validation(
            "ends_at time minutes must be :00 or :30".into(),
        ));
    }
    Ok((start, end))
}

/// Weekday, business hours, and not already taken.
fn is_open(slot: &Timestamp, busy: &HashSet<i64>) -> bool {
    if busy.contains(&slot.timestamp()) {
        return false;
    }
    if matches!(slot.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }
    let hour = slot.hour();
    (BUSINESS_OPEN_HOUR..=BUSINESS_LAST_HOUR).contains(&hour)
}

/// Walk `[start, end]` in half-hour steps, collecting open slot starts.
///
/// Weekday and hour are judged in `start`'s own offset, and slots are
/// formatted in that offset. Conflicts are exact start-instant matches only:
/// an appointment that begins mid-slot does not block it. Stops after
/// `MAX_SLOTS` open slots even if `end` is not reached.
pub fn open_slots(start: Timestamp, end: Timestamp, busy: &HashSet<i64>) -> Vec<String> {
    let step = Duration::minutes(SLOT_MINUTES);
    let mut slots = Vec::new();
    let mut cursor = start;

    while cursor <= end {
        if is_open(&cursor, busy) {
            if slots.len() >= MAX_SLOTS {
                info!("{MAX_SLOTS} available slots reached, truncating at {}", format_timestamp(&cursor));
                metrics::counter!(crate::observability::SLOT_CAP_HITS_TOTAL).increment(1);
                break;
            }
            slots.push(format_timestamp(&cursor));
        }
        cursor = match cursor.checked_add_signed(step) {
            Some(next) => next,
            None => break,
        };
    }

    slots
}

/// Validate the window, build the busy lookup, and enumerate open slots.
/// `trainer_appointments` is expected to be pre-filtered to one trainer.
pub fn availability(
    trainer_appointments: &[Appointment],
    starts_at: &str,
    ends_at: &str,
) -> Result<Vec<String>, EngineError> {
    let (start, end) = parse_window(starts_at, ends_at)?;
    let busy = busy_lookup(trainer_appointments);
    Ok(open_slots(start, end, &busy))
}
