//! One booking card: a counselor profile plus the selection, the
//! non-availability fetch and the submission that belong to it.

use crate::clock::Clock;
use crate::models::CounselorProfile;
use crate::non_availability::{merge_non_availability, NonAvailability};
use crate::selection::{SelectTarget, SelectionState};
use crate::slots::{DayPart, SlotGroups};
use crate::storage::ScratchStorage;
use crate::transaction::{
    BookingIntent, BookingRequest, BookingTransaction, TransactionResult, TransactionStatus,
};
use chrono::NaiveDate;
use counselify_common::services::{BookingService, NonAvailabilityService, RescheduleAck};
use counselify_common::{fetch_error, log_error, timeout_error, CounselifyError};
use counselify_config::BookingSettings;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything a card needs from its host besides the profile and services.
#[derive(Clone)]
pub struct CardContext {
    pub user_id: String,
    pub storage: Arc<dyn ScratchStorage>,
    pub clock: Arc<dyn Clock>,
    pub settings: BookingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationView {
    pub counselor_name: String,
    pub date: NaiveDate,
    /// Slot label, e.g. "09:30-10:00".
    pub time: String,
    pub image_url: Option<String>,
    pub booking_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardView {
    Selecting,
    Confirmation(ConfirmationView),
}

/// Result of [`BookingCard::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Confirmed(ConfirmationView),
    Rescheduled(RescheduleAck),
    Failed(String),
    /// Nothing was sent: the selection is incomplete or a submission is
    /// already in flight.
    Rejected,
}

type RescheduledCallback = Box<dyn Fn(&RescheduleAck) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
pub struct BookingCallbacks {
    pub on_rescheduled: Option<RescheduledCallback>,
    pub on_error: Option<ErrorCallback>,
}

/// Identifies one non-availability fetch. A result is applied only if the
/// card still shows the same counselor in the same generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub counselor_id: String,
    pub generation: u64,
}

pub struct BookingCard<N, B> {
    user_id: String,
    storage: Arc<dyn ScratchStorage>,
    clock: Arc<dyn Clock>,
    settings: BookingSettings,
    non_availability_service: Arc<N>,
    booking_service: Arc<B>,
    callbacks: BookingCallbacks,
    selection: SelectionState,
    transaction: BookingTransaction,
    view: CardView,
    generation: u64,
    mounted: bool,
}

impl<N, B> BookingCard<N, B>
where
    N: NonAvailabilityService,
    B: BookingService,
{
    pub fn new(
        profile: CounselorProfile,
        context: CardContext,
        non_availability_service: Arc<N>,
        booking_service: Arc<B>,
    ) -> Self {
        let selection = SelectionState::restore(
            profile,
            context.settings.clone(),
            context.storage.clone(),
            context.clock.clone(),
        );
        Self {
            user_id: context.user_id,
            storage: context.storage,
            clock: context.clock,
            settings: context.settings,
            non_availability_service,
            booking_service,
            callbacks: BookingCallbacks::default(),
            selection,
            transaction: BookingTransaction::new(),
            view: CardView::Selecting,
            generation: 0,
            mounted: true,
        }
    }

    pub fn with_callbacks(mut self, callbacks: BookingCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn profile(&self) -> &CounselorProfile {
        self.selection.profile()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn view(&self) -> &CardView {
        &self.view
    }

    pub fn transaction_status(&self) -> &TransactionStatus {
        self.transaction.status()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn visible_slots(&self) -> SlotGroups {
        self.selection.visible_slots()
    }

    pub fn disabled_slot_ids(&self) -> &BTreeSet<String> {
        self.selection.disabled_slot_ids()
    }

    pub fn is_date_selectable(&self, date: NaiveDate) -> bool {
        self.selection.is_date_selectable(date)
    }

    pub fn quick_pick_dates(&self) -> Vec<NaiveDate> {
        self.selection.quick_pick_dates()
    }

    pub fn select(&mut self, target: SelectTarget) -> bool {
        self.selection.select(target)
    }

    pub fn toggle_group(&mut self, part: DayPart) {
        self.selection.toggle_group(part);
    }

    /// Recomputes past-time filtering against the clock.
    pub fn refresh(&mut self) {
        self.selection.refresh();
    }

    /// Whether the submit control should be disabled.
    pub fn submit_disabled(&self) -> bool {
        self.transaction.is_pending() || self.selection.completed().is_none()
    }

    /// Starts a non-availability fetch for the current counselor.
    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket {
            counselor_id: self.profile().id.clone(),
            generation: self.generation,
        }
    }

    /// Applies the outcome of the fetch identified by `ticket`.
    ///
    /// Stale tickets are discarded and `false` is returned. A failed fetch
    /// is treated as "nothing blocked".
    pub fn apply_non_availability(
        &mut self,
        ticket: FetchTicket,
        result: Result<Value, CounselifyError>,
    ) -> bool {
        if !self.mounted || ticket != self.begin_fetch() {
            debug!(
                "Discarding stale non-availability for {} (generation {})",
                ticket.counselor_id, ticket.generation
            );
            return false;
        }
        let non_availability = match result {
            Ok(raw) => merge_non_availability(&raw),
            Err(err) => {
                warn!(
                    "Non-availability for {} unavailable, assuming no blocks: {}",
                    ticket.counselor_id, err
                );
                NonAvailability::new()
            }
        };
        self.selection.set_non_availability(non_availability);
        true
    }

    /// Fetches and applies non-availability, bounded by the fetch timeout.
    pub async fn refresh_non_availability(&mut self) -> bool {
        let ticket = self.begin_fetch();
        let service = Arc::clone(&self.non_availability_service);
        let user_id = self.user_id.clone();
        let timeout = Duration::from_secs(self.settings.fetch_timeout_secs);

        let fetch = service.fetch_non_availability(&user_id, &ticket.counselor_id);
        let result = match tokio::time::timeout(timeout, fetch).await {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(err)) => Err(fetch_error("non-availability", err)),
            Err(_) => Err(timeout_error(format!(
                "non-availability fetch did not finish within {}s",
                timeout.as_secs()
            ))),
        };
        self.apply_non_availability(ticket, result)
    }

    /// Submits the completed selection.
    ///
    /// A confirmed booking clears the selection and shows the confirmation
    /// view. A confirmed reschedule only notifies the caller. A failure is
    /// reported through `on_error` and leaves the selection as it was.
    pub async fn submit(&mut self, intent: BookingIntent) -> Outcome {
        if self.transaction.is_pending() {
            debug!("Submission already pending for {}", self.profile().id);
            return Outcome::Rejected;
        }
        let Some(completed) = self.selection.completed() else {
            debug!("Ignoring submit with incomplete selection for {}", self.profile().id);
            return Outcome::Rejected;
        };

        let request = BookingRequest::build(&self.user_id, &self.profile().id, &completed, intent);
        let timeout = Duration::from_secs(self.settings.submit_timeout_secs);
        let service = Arc::clone(&self.booking_service);

        match self.transaction.execute(service.as_ref(), request, timeout).await {
            Ok(TransactionResult::Booked(receipt)) => {
                let profile = self.selection.profile();
                let confirmation = ConfirmationView {
                    counselor_name: profile.name.clone(),
                    date: completed.slot.date,
                    time: completed.slot.label.clone(),
                    image_url: profile.image_url.clone(),
                    booking_id: receipt.booking_id,
                };
                info!(
                    "Booked {} on {} at {}",
                    profile.id, confirmation.date, confirmation.time
                );
                self.selection.clear();
                self.view = CardView::Confirmation(confirmation.clone());
                Outcome::Confirmed(confirmation)
            }
            Ok(TransactionResult::Rescheduled(ack)) => {
                info!("Rescheduled appointment with {}", self.profile().id);
                if let Some(callback) = &self.callbacks.on_rescheduled {
                    callback(&ack);
                }
                Outcome::Rescheduled(ack)
            }
            Err(err) => {
                log_error(&err, "Booking submission failed");
                let message = err.to_string();
                if let Some(callback) = &self.callbacks.on_error {
                    callback(&message);
                }
                Outcome::Failed(message)
            }
        }
    }

    /// Returns from the confirmation view to date selection.
    pub fn back_to_selection(&mut self) {
        self.view = CardView::Selecting;
    }

    /// Shows another counselor. In-flight fetches for the previous one are
    /// discarded when they land.
    pub fn switch_counselor(&mut self, profile: CounselorProfile) {
        self.generation += 1;
        self.selection = SelectionState::restore(
            profile,
            self.settings.clone(),
            self.storage.clone(),
            self.clock.clone(),
        );
        self.transaction = BookingTransaction::new();
        self.view = CardView::Selecting;
    }

    pub fn unmount(&mut self) {
        self.generation += 1;
        self.mounted = false;
    }
}
