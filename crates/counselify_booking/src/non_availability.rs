//! Normalization of the remote non-availability ledger.
//!
//! The counselor service answers in two shapes, depending on the endpoint
//! version:
//!
//! ```json
//! [ { "date": "2025-06-02", "slots": ["10:00-10:30", "14:00"] } ]
//! { "2025-06-02": ["10:00-10:30"], "2025-06-03": { "times": ["9am"] } }
//! ```
//!
//! Both are folded into [`NonAvailability`] here and nowhere else.

use crate::models::CounselorProfile;
use crate::slots::{generate_slots_with_length, OfficeDefaults, Slot};
use crate::time::{minutes_since_midnight, parse_date_key, parse_time_on_date};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

const DATE_FIELDS: [&str; 3] = ["date", "day", "dateString"];
const SLOT_LIST_FIELDS: [&str; 3] = ["slots", "times", "nonAvailableSlots"];
const SLOT_START_FIELDS: [&str; 3] = ["startTime", "start", "time"];

/// Blocked slot start offsets (minutes since midnight) per date.
///
/// A date is present only if at least one blocked start was recorded for
/// it; an explicitly empty list in the payload means "available".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonAvailability {
    blocked: BTreeMap<NaiveDate, BTreeSet<u32>>,
}

impl NonAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Dates with at least one blocked start, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.blocked.keys().copied()
    }

    pub fn blocked_minutes(&self, date: NaiveDate) -> Option<&BTreeSet<u32>> {
        self.blocked.get(&date)
    }

    pub fn is_blocked_at(&self, start: NaiveDateTime) -> bool {
        self.blocked
            .get(&start.date())
            .is_some_and(|minutes| minutes.contains(&minutes_since_midnight(start)))
    }

    pub fn is_blocked(&self, slot: &Slot) -> bool {
        self.is_blocked_at(slot.start)
    }

    fn insert(&mut self, date: NaiveDate, minutes: BTreeSet<u32>) {
        if minutes.is_empty() {
            return;
        }
        self.blocked.entry(date).or_default().extend(minutes);
    }
}

/// Normalizes a raw non-availability payload.
///
/// Unparsable dates and slot tokens are logged and skipped; they never fail
/// the whole payload.
pub fn merge_non_availability(raw: &Value) -> NonAvailability {
    let mut merged = NonAvailability::new();
    match raw {
        Value::Array(records) => {
            for record in records {
                let Some(fields) = record.as_object() else {
                    warn!("Skipping non-availability record that is not an object: {}", record);
                    continue;
                };
                let Some(date_str) = first_str(fields, &DATE_FIELDS) else {
                    warn!("Skipping non-availability record without a date: {}", record);
                    continue;
                };
                let slots = first_field(fields, &SLOT_LIST_FIELDS);
                merge_entry(&mut merged, date_str, slots);
            }
        }
        Value::Object(map) => {
            for (date_str, entry) in map {
                let slots = match entry {
                    Value::Object(fields) => first_field(fields, &SLOT_LIST_FIELDS),
                    other => Some(other),
                };
                merge_entry(&mut merged, date_str, slots);
            }
        }
        Value::Null => {}
        other => warn!("Unexpected non-availability payload shape: {}", other),
    }
    merged
}

fn merge_entry(merged: &mut NonAvailability, date_str: &str, slots: Option<&Value>) {
    let slots = match slots {
        Some(Value::Array(items)) if !items.is_empty() => items,
        // missing, null or empty: the date is available
        _ => return,
    };
    let Some(date) = parse_date_key(date_str) else {
        warn!("Skipping non-availability entry with unparsable date {:?}", date_str);
        return;
    };

    let mut minutes = BTreeSet::new();
    for item in slots {
        let token = match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(fields) => first_str(fields, &SLOT_START_FIELDS),
            _ => None,
        };
        let start = token
            .map(slot_start_token)
            .and_then(|t| parse_time_on_date(date, t));
        match start {
            Some(start) => {
                minutes.insert(minutes_since_midnight(start));
            }
            None => debug!("Skipping unparsable blocked slot {} on {}", item, date),
        }
    }
    merged.insert(date, minutes);
}

/// The start part of "10:00-10:30" style tokens.
fn slot_start_token(token: &str) -> &str {
    token.split('-').next().unwrap_or(token).trim()
}

fn first_field<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| fields.get(*name).filter(|v| !v.is_null()))
}

fn first_str<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| fields.get(*name).and_then(Value::as_str))
}

/// Dates of `map` on which nothing can be booked.
///
/// A date qualifies when slot generation yields nothing, or every generated
/// slot is blocked or, on `now`'s own date, already started.
pub fn compute_fully_unavailable_dates(
    map: &NonAvailability,
    profile: &CounselorProfile,
    now: NaiveDateTime,
    slot_length_minutes: u32,
    defaults: OfficeDefaults<'_>,
) -> BTreeSet<NaiveDate> {
    map.dates()
        .filter(|date| {
            let slots = generate_slots_with_length(*date, profile, slot_length_minutes, defaults);
            slots
                .iter()
                .all(|slot| map.is_blocked(slot) || is_past(slot, now))
        })
        .collect()
}

/// True for slots of `now`'s date that start before `now`.
pub fn is_past(slot: &Slot, now: NaiveDateTime) -> bool {
    slot.date == now.date() && slot.start < now
}
