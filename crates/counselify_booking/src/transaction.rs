//! Booking and reschedule submission.
//!
//! A [`BookingTransaction`] moves `Idle -> Pending -> Confirmed | Failed`
//! and never has more than one request in flight.

use crate::selection::CompletedSelection;
use crate::time::date_key;
use chrono::NaiveDate;
use counselify_common::services::{
    BookingMode, BookingPayload, BookingReceipt, BookingService, RescheduleAck, ReschedulePayload,
};
use counselify_common::{timeout_error, transaction_error, validation_error, CounselifyError};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransactionStatus {
    #[default]
    Idle,
    Pending,
    Confirmed,
    Failed(String),
}

/// The appointment being moved by a reschedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingAppointment {
    pub appointment_id: String,
    pub date: NaiveDate,
    /// "HH:MM"
    pub start_time: String,
}

/// What the caller wants done with the completed selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingIntent {
    Book {
        mode: BookingMode,
        notes: Option<String>,
        notify_token: Option<String>,
    },
    Reschedule {
        appointment: ExistingAppointment,
        auth_token: String,
    },
}

impl BookingIntent {
    /// A fresh booking without notes or push token.
    pub fn book(mode: BookingMode) -> Self {
        BookingIntent::Book {
            mode,
            notes: None,
            notify_token: None,
        }
    }
}

/// A request ready to be sent to the [`BookingService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingRequest {
    Create(BookingPayload),
    Reschedule {
        payload: ReschedulePayload,
        auth_token: String,
    },
}

impl BookingRequest {
    /// Builds the request for `selection`. The booked date is the date the
    /// slot was generated for and the start time is the slot's start label.
    pub fn build(
        user_id: &str,
        counselor_id: &str,
        selection: &CompletedSelection,
        intent: BookingIntent,
    ) -> Self {
        let date = date_key(selection.slot.date);
        let start_time = selection.slot.start_label();
        match intent {
            BookingIntent::Book {
                mode,
                notes,
                notify_token,
            } => BookingRequest::Create(BookingPayload {
                user_id: user_id.to_string(),
                counselor_id: counselor_id.to_string(),
                date,
                start_time,
                mode,
                notes: notes.filter(|n| !n.trim().is_empty()),
                notify_token,
            }),
            BookingIntent::Reschedule {
                appointment,
                auth_token,
            } => BookingRequest::Reschedule {
                payload: ReschedulePayload {
                    appointment_id: appointment.appointment_id,
                    user_id: user_id.to_string(),
                    counselor_id: counselor_id.to_string(),
                    date,
                    start_time,
                    old_date: date_key(appointment.date),
                    old_start_time: appointment.start_time,
                },
                auth_token,
            },
        }
    }

    pub fn is_reschedule(&self) -> bool {
        matches!(self, BookingRequest::Reschedule { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionResult {
    Booked(BookingReceipt),
    Rescheduled(RescheduleAck),
}

#[derive(Debug, Default)]
pub struct BookingTransaction {
    status: TransactionStatus,
}

impl BookingTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &TransactionStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    /// Marks the transaction as in flight. Returns `false` if it already was.
    pub fn begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        self.status = TransactionStatus::Pending;
        true
    }

    /// Sends `request` and settles the status from the answer.
    ///
    /// The call is bounded by `timeout`; a timeout, a transport error or a
    /// server answer that reports failure all end in `Failed`.
    pub async fn execute<B: BookingService>(
        &mut self,
        service: &B,
        request: BookingRequest,
        timeout: Duration,
    ) -> Result<TransactionResult, CounselifyError> {
        if !self.begin() {
            return Err(validation_error("a submission is already pending"));
        }
        debug!("Submitting {:?}", request);

        let result = match request {
            BookingRequest::Create(payload) => {
                match tokio::time::timeout(timeout, service.submit_booking(payload)).await {
                    Ok(Ok(receipt)) => check_receipt(receipt).map(TransactionResult::Booked),
                    Ok(Err(err)) => Err(transaction_error(err)),
                    Err(_) => Err(timeout_error(format!(
                        "booking request did not finish within {}s",
                        timeout.as_secs()
                    ))),
                }
            }
            BookingRequest::Reschedule {
                payload,
                auth_token,
            } => {
                match tokio::time::timeout(timeout, service.submit_reschedule(payload, &auth_token))
                    .await
                {
                    Ok(Ok(ack)) => check_ack(ack).map(TransactionResult::Rescheduled),
                    Ok(Err(err)) => Err(transaction_error(err)),
                    Err(_) => Err(timeout_error(format!(
                        "reschedule request did not finish within {}s",
                        timeout.as_secs()
                    ))),
                }
            }
        };

        match &result {
            Ok(_) => {
                info!("Booking transaction confirmed");
                self.status = TransactionStatus::Confirmed;
            }
            Err(err) => {
                warn!("Booking transaction failed: {}", err);
                self.status = TransactionStatus::Failed(err.to_string());
            }
        }
        result
    }
}

fn check_receipt(receipt: BookingReceipt) -> Result<BookingReceipt, CounselifyError> {
    let status = receipt.status.to_ascii_lowercase();
    if status == "failed" || status == "error" {
        let message = receipt
            .extra
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("booking was not accepted");
        return Err(transaction_error(message));
    }
    Ok(receipt)
}

fn check_ack(ack: RescheduleAck) -> Result<RescheduleAck, CounselifyError> {
    if !ack.success {
        let message = ack
            .message
            .as_deref()
            .unwrap_or("reschedule was not accepted");
        return Err(transaction_error(message));
    }
    Ok(ack)
}
