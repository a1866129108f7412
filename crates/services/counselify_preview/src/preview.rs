// --- File: crates/services/counselify_preview/src/preview.rs ---
use chrono::NaiveDate;
use counselify_booking::slots::{DayPart, Slot};
use counselify_booking::{BookingCard, CounselorProfile};
use counselify_common::services::{BookingService, NonAvailabilityService};
use serde::Serialize;

/// JSON snapshot of a booking card.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPreview {
    pub counselor_id: String,
    pub counselor_name: String,
    pub quick_picks: Vec<NaiveDate>,
    pub selected_date: Option<NaiveDate>,
    pub slot_base_date: NaiveDate,
    pub morning: Vec<Slot>,
    pub afternoon: Vec<Slot>,
    pub evening: Vec<Slot>,
    pub disabled_slot_ids: Vec<String>,
    pub fully_unavailable_dates: Vec<NaiveDate>,
}

/// Fetches non-availability for `card` and snapshots what it would show.
pub async fn build_preview<N, B>(card: &mut BookingCard<N, B>) -> CardPreview
where
    N: NonAvailabilityService,
    B: BookingService,
{
    card.refresh_non_availability().await;

    let groups = card.visible_slots();
    let selection = card.selection();
    CardPreview {
        counselor_id: card.profile().id.clone(),
        counselor_name: card.profile().name.clone(),
        quick_picks: card.quick_pick_dates(),
        selected_date: selection.selected_date(),
        slot_base_date: selection.slot_base_date(),
        morning: groups.get(DayPart::Morning).to_vec(),
        afternoon: groups.get(DayPart::Afternoon).to_vec(),
        evening: groups.get(DayPart::Evening).to_vec(),
        disabled_slot_ids: card.disabled_slot_ids().iter().cloned().collect(),
        fully_unavailable_dates: selection.fully_unavailable_dates().iter().copied().collect(),
    }
}

/// Profile used when no profile file is given.
pub fn sample_profile() -> CounselorProfile {
    CounselorProfile::new("sample-counselor")
        .with_name("Dr. Sample")
        .with_working_days(["Monday", "Wednesday", "Friday"])
        .with_office_hours("10:00", "7:00 pm")
}
