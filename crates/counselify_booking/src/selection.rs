//! Selection state of one open booking card.
//!
//! Owns the chosen date and slot, restores them from per-counselor scratch
//! storage, and keeps the derived state (slot base date, generated slots,
//! disabled ids, expanded day part) consistent after every input change.

use crate::calendar::WorkingDayCalendar;
use crate::clock::Clock;
use crate::models::CounselorProfile;
use crate::non_availability::{compute_fully_unavailable_dates, is_past, NonAvailability};
use crate::slots::{generate_slots_with_length, DayPart, OfficeDefaults, Slot, SlotGroups};
use crate::storage::{CounselorScratch, ScratchStorage};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use counselify_config::BookingSettings;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// What the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectTarget {
    Date(NaiveDate),
    Slot(String),
}

/// A (date, slot) pair ready for a booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSelection {
    pub date: NaiveDate,
    pub slot: Slot,
}

pub struct SelectionState {
    profile: CounselorProfile,
    calendar: WorkingDayCalendar,
    settings: BookingSettings,
    scratch: CounselorScratch,
    clock: Arc<dyn Clock>,
    non_availability: NonAvailability,
    fully_unavailable: BTreeSet<NaiveDate>,
    selected_date: Option<NaiveDate>,
    selected_slot_id: Option<String>,
    slot_base_date: NaiveDate,
    slots: Vec<Slot>,
    disabled: BTreeSet<String>,
    expanded: Option<DayPart>,
}

impl SelectionState {
    /// Builds the selection for `profile`, restoring a previous (date, slot)
    /// from scratch storage when it is still selectable.
    pub fn restore(
        profile: CounselorProfile,
        settings: BookingSettings,
        storage: Arc<dyn ScratchStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let calendar = WorkingDayCalendar::from_names(&profile.working_days);
        let scratch = CounselorScratch::new(storage, &settings.storage_key_prefix, &profile.id);
        let today = clock.now().date();
        let mut state = Self {
            slot_base_date: calendar.first_working_from(today),
            profile,
            calendar,
            settings,
            scratch,
            clock,
            non_availability: NonAvailability::new(),
            fully_unavailable: BTreeSet::new(),
            selected_date: None,
            selected_slot_id: None,
            slots: Vec::new(),
            disabled: BTreeSet::new(),
            expanded: None,
        };

        let restored_date = state
            .scratch
            .load_date()
            .filter(|date| state.is_date_selectable(*date));
        state.selected_date = Some(restored_date.unwrap_or_else(|| state.first_working_from_today()));
        state.recompute();

        if restored_date.is_some() {
            if let Some(slot_id) = state.scratch.load_slot() {
                if state.is_slot_selectable(&slot_id) {
                    state.selected_slot_id = Some(slot_id);
                } else {
                    debug!("Dropping restored slot {} for {}", slot_id, state.profile.id);
                }
            }
        }
        debug!(
            "Selection for {} starts at {:?} / {:?}",
            state.profile.id, state.selected_date, state.selected_slot_id
        );
        state
    }

    pub fn profile(&self) -> &CounselorProfile {
        &self.profile
    }

    pub fn calendar(&self) -> &WorkingDayCalendar {
        &self.calendar
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    pub fn first_working_from_today(&self) -> NaiveDate {
        self.calendar.first_working_from(self.today())
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_slot_id(&self) -> Option<&str> {
        self.selected_slot_id.as_deref()
    }

    pub fn selected_slot(&self) -> Option<&Slot> {
        let id = self.selected_slot_id.as_deref()?;
        self.slots.iter().find(|slot| slot.id == id)
    }

    /// The date whose slots are shown.
    pub fn slot_base_date(&self) -> NaiveDate {
        self.slot_base_date
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn visible_slots(&self) -> SlotGroups {
        SlotGroups::from_slots(&self.slots)
    }

    /// Ids of slots that are blocked or, today, already started.
    pub fn disabled_slot_ids(&self) -> &BTreeSet<String> {
        &self.disabled
    }

    pub fn fully_unavailable_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.fully_unavailable
    }

    pub fn non_availability(&self) -> &NonAvailability {
        &self.non_availability
    }

    /// Last date the picker allows.
    pub fn last_selectable_date(&self) -> NaiveDate {
        self.today() + Duration::days(self.settings.booking_horizon_days)
    }

    /// In range and not fully unavailable. Non-working dates pass; their
    /// slots come from the first working day instead.
    pub fn is_date_selectable(&self, date: NaiveDate) -> bool {
        date >= self.today()
            && date <= self.last_selectable_date()
            && !self.fully_unavailable.contains(&date)
    }

    pub fn is_slot_selectable(&self, slot_id: &str) -> bool {
        self.slots.iter().any(|slot| slot.id == slot_id) && !self.disabled.contains(slot_id)
    }

    /// Date shortcuts: the next working dates from today, with the current
    /// selection forced into the first position when it is not among them.
    pub fn quick_pick_dates(&self) -> Vec<NaiveDate> {
        let base = self.first_working_from_today();
        let count = self.settings.quick_pick_count;
        let mut dates = if self.settings.quick_picks_skip_fully_unavailable {
            self.calendar
                .working_dates_between(base, self.last_selectable_date())
                .into_iter()
                .filter(|date| !self.fully_unavailable.contains(date))
                .take(count)
                .collect()
        } else {
            self.calendar.next_n_working_dates(base, count)
        };
        if let Some(selected) = self.selected_date {
            if !dates.contains(&selected) {
                if let Some(first) = dates.first_mut() {
                    *first = selected;
                }
            }
        }
        dates
    }

    pub fn select(&mut self, target: SelectTarget) -> bool {
        match target {
            SelectTarget::Date(date) => self.select_date(date),
            SelectTarget::Slot(slot_id) => self.select_slot(&slot_id),
        }
    }

    /// Picks a date. Out-of-range and fully unavailable dates are ignored.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        if !self.is_date_selectable(date) {
            debug!("Ignoring unselectable date {} for {}", date, self.profile.id);
            return false;
        }
        self.selected_date = Some(date);
        self.scratch.save_date(date);
        self.recompute();
        true
    }

    /// Picks a slot of the current slot base date.
    pub fn select_slot(&mut self, slot_id: &str) -> bool {
        if self.selected_date.is_none() || !self.is_slot_selectable(slot_id) {
            debug!("Ignoring unselectable slot {} for {}", slot_id, self.profile.id);
            return false;
        }
        self.selected_slot_id = Some(slot_id.to_string());
        self.scratch.save_slot(Some(slot_id));
        true
    }

    /// Replaces the non-availability ledger and recomputes everything that
    /// depends on it.
    pub fn set_non_availability(&mut self, non_availability: NonAvailability) {
        self.non_availability = non_availability;
        self.recompute();
    }

    /// Recomputes derived state against the current clock.
    pub fn refresh(&mut self) {
        self.recompute();
    }

    pub fn expanded_group(&self) -> Option<DayPart> {
        self.expanded
    }

    pub fn set_expanded_group(&mut self, part: Option<DayPart>) {
        self.expanded = part;
        self.apply_auto_collapse();
    }

    pub fn toggle_group(&mut self, part: DayPart) {
        let next = if self.expanded == Some(part) { None } else { Some(part) };
        self.set_expanded_group(next);
    }

    /// The selection, if both parts are set and the slot is still bookable.
    pub fn completed(&self) -> Option<CompletedSelection> {
        self.selected_date?;
        let slot = self.selected_slot()?;
        if self.disabled.contains(&slot.id) {
            return None;
        }
        Some(CompletedSelection {
            date: slot.date,
            slot: slot.clone(),
        })
    }

    /// Forgets the selection, including its scratch entries, and goes back
    /// to the first working day with no slot.
    pub fn clear(&mut self) {
        self.scratch.clear();
        self.selected_date = Some(self.first_working_from_today());
        self.selected_slot_id = None;
        self.recompute();
    }

    fn recompute(&mut self) {
        let now = self.now();
        let defaults = OfficeDefaults {
            start: &self.settings.default_office_start,
            end: &self.settings.default_office_end,
        };
        let length = self.settings.slot_length_minutes;

        self.fully_unavailable = compute_fully_unavailable_dates(
            &self.non_availability,
            &self.profile,
            now,
            length,
            defaults,
        );

        let fallback = self.calendar.first_working_from(now.date());
        let candidate = self.selected_date.unwrap_or(fallback);
        self.slot_base_date =
            if self.calendar.is_working_day(candidate) && !self.fully_unavailable.contains(&candidate) {
                candidate
            } else {
                fallback
            };

        self.slots = generate_slots_with_length(self.slot_base_date, &self.profile, length, defaults);
        self.disabled = self
            .slots
            .iter()
            .filter(|slot| self.non_availability.is_blocked(slot) || is_past(slot, now))
            .map(|slot| slot.id.clone())
            .collect();

        if let Some(slot_id) = self.selected_slot_id.clone() {
            if !self.is_slot_selectable(&slot_id) {
                debug!("Clearing slot {} no longer available on {}", slot_id, self.slot_base_date);
                self.selected_slot_id = None;
                self.scratch.save_slot(None);
            }
        }
        self.apply_auto_collapse();
    }

    fn apply_auto_collapse(&mut self) {
        if self.expanded != Some(DayPart::Evening) {
            return;
        }
        let evening_open = self
            .slots
            .iter()
            .any(|slot| DayPart::of(slot) == DayPart::Evening && !self.disabled.contains(&slot.id));
        if !evening_open {
            self.expanded = None;
        }
    }
}
