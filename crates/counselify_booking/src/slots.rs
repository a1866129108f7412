use crate::models::{CounselorProfile, DEFAULT_OFFICE_END, DEFAULT_OFFICE_START};
use crate::time::{format_time_label, parse_time_on_date};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use tracing::{debug, warn};

/// Length of a bookable slot unless configured otherwise.
pub const SLOT_LENGTH_MINUTES: u32 = 30;

// --- Data Structures ---

/// A bookable window `[start, end)` on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// "HH:MM-HH:MM"
    pub label: String,
    /// Label without separators, e.g. "09000930".
    pub id: String,
}

impl Slot {
    fn new(date: NaiveDate, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let label = format!("{}-{}", format_time_label(start), format_time_label(end));
        let id = slot_id_from_label(&label);
        Self {
            date,
            start,
            end,
            label,
            id,
        }
    }

    /// "HH:MM" of the slot start, as sent to the booking service.
    pub fn start_label(&self) -> String {
        format_time_label(self.start)
    }
}

/// Strips the separators from a slot label: "09:00-09:30" -> "09000930".
pub fn slot_id_from_label(label: &str) -> String {
    label.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Display grouping of slots by their start hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    pub fn of(slot: &Slot) -> Self {
        match slot.start.hour() {
            0..=11 => DayPart::Morning,
            12..=17 => DayPart::Afternoon,
            _ => DayPart::Evening,
        }
    }
}

/// Slots of one date partitioned into day parts, each in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlotGroups {
    pub morning: Vec<Slot>,
    pub afternoon: Vec<Slot>,
    pub evening: Vec<Slot>,
}

impl SlotGroups {
    pub fn from_slots(slots: &[Slot]) -> Self {
        let mut groups = SlotGroups::default();
        for slot in slots {
            match DayPart::of(slot) {
                DayPart::Morning => groups.morning.push(slot.clone()),
                DayPart::Afternoon => groups.afternoon.push(slot.clone()),
                DayPart::Evening => groups.evening.push(slot.clone()),
            }
        }
        groups
    }

    pub fn get(&self, part: DayPart) -> &[Slot] {
        match part {
            DayPart::Morning => &self.morning,
            DayPart::Afternoon => &self.afternoon,
            DayPart::Evening => &self.evening,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.morning.is_empty() && self.afternoon.is_empty() && self.evening.is_empty()
    }

    pub fn len(&self) -> usize {
        self.morning.len() + self.afternoon.len() + self.evening.len()
    }
}

// --- Office Window ---

/// Office window used for generation, with start/end tokens already defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfficeDefaults<'a> {
    pub start: &'a str,
    pub end: &'a str,
}

impl Default for OfficeDefaults<'_> {
    fn default() -> Self {
        Self {
            start: DEFAULT_OFFICE_START,
            end: DEFAULT_OFFICE_END,
        }
    }
}

/// Resolves the office window of `profile` on `date`.
///
/// When the end is not after the start the window crosses midnight and the
/// end is moved to the following day. Returns `None` if either token cannot
/// be parsed.
pub fn resolve_office_window(
    date: NaiveDate,
    profile: &CounselorProfile,
    defaults: OfficeDefaults<'_>,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start_token = profile.office_start_time.as_deref().unwrap_or(defaults.start);
    let end_token = profile.office_end_time.as_deref().unwrap_or(defaults.end);

    let start = parse_time_on_date(date, start_token);
    let end = parse_time_on_date(date, end_token);
    let (start, mut end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            warn!(
                "Unparsable office hours for counselor {}: {:?}-{:?}",
                profile.id, start_token, end_token
            );
            return None;
        }
    };
    if end <= start {
        end += Duration::days(1);
    }
    Some((start, end))
}

// --- Slot Generation ---

/// Generates the 30-minute slots of `date` for `profile`.
pub fn generate_slots_for_date(date: NaiveDate, profile: &CounselorProfile) -> Vec<Slot> {
    generate_slots_with_length(date, profile, SLOT_LENGTH_MINUTES, OfficeDefaults::default())
}

/// Generates consecutive `[cur, cur + length)` windows inside the office
/// window of `date`.
///
/// A window is emitted only if it ends no later than the office end and no
/// later than the midnight that closes `date`: hours that spill into the next
/// day after a midnight-crossing window are not part of this date.
pub fn generate_slots_with_length(
    date: NaiveDate,
    profile: &CounselorProfile,
    length_minutes: u32,
    defaults: OfficeDefaults<'_>,
) -> Vec<Slot> {
    if length_minutes == 0 {
        return Vec::new();
    }
    let Some((start, end)) = resolve_office_window(date, profile, defaults) else {
        return Vec::new();
    };
    let day_end = match date.succ_opt() {
        Some(next) => next.and_time(chrono::NaiveTime::MIN),
        None => return Vec::new(),
    };
    let cutoff = end.min(day_end);
    let length = Duration::minutes(i64::from(length_minutes));

    let mut slots = Vec::new();
    let mut current = start;
    while current + length <= cutoff {
        slots.push(Slot::new(date, current, current + length));
        current += length;
    }
    debug!(
        "Generated {} slots for {} on {} ({} - {})",
        slots.len(),
        profile.id,
        date,
        start,
        end
    );
    slots
}
