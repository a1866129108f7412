//! Service abstractions for the remote counselor service.
//!
//! These traits decouple the booking engine from the HTTP clients that talk
//! to the counselor backend, so the engine can be driven by mocks in tests
//! and by a reqwest client in production.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Read access to a counselor's non-availability ledger.
pub trait NonAvailabilityService: Send + Sync {
    /// Error type returned by the service. Only transport failures are
    /// errors; "no data" is an empty or null payload.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the raw blocked-slots payload for a counselor as seen by a user.
    ///
    /// The payload is either an array of records or a map keyed by date; the
    /// booking engine normalizes both shapes.
    fn fetch_non_availability(
        &self,
        user_id: &str,
        counselor_id: &str,
    ) -> BoxFuture<'_, serde_json::Value, Self::Error>;
}

/// Create and reschedule appointments.
pub trait BookingService: Send + Sync {
    /// Error type returned by booking operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a fresh booking.
    fn submit_booking(&self, payload: BookingPayload) -> BoxFuture<'_, BookingReceipt, Self::Error>;

    /// Move an existing appointment to a new date and start time.
    fn submit_reschedule(
        &self,
        payload: ReschedulePayload,
        auth_token: &str,
    ) -> BoxFuture<'_, RescheduleAck, Self::Error>;
}

/// How the session takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingMode {
    Online,
    Offline,
}

impl std::fmt::Display for BookingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingMode::Online => write!(f, "online"),
            BookingMode::Offline => write!(f, "offline"),
        }
    }
}

/// Body of a create-booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub user_id: String,
    pub counselor_id: String,
    /// "YYYY-MM-DD"
    pub date: String,
    /// "HH:MM"
    pub start_time: String,
    pub mode: BookingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Push token the backend uses to notify the user about the booking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_token: Option<String>,
}

/// Body of a reschedule request.
///
/// Carries the original date and start time so the server can diff the
/// move without another lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReschedulePayload {
    pub appointment_id: String,
    pub user_id: String,
    pub counselor_id: String,
    pub date: String,
    pub start_time: String,
    pub old_date: String,
    pub old_start_time: String,
}

/// Server answer to a create-booking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub status: String,
    #[serde(default)]
    pub booking_id: Option<String>,
    /// Any further fields the backend includes.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Server answer to a reschedule request.
///
/// A 2xx answer is an acceptance unless the body says `"success": false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleAck {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl Default for RescheduleAck {
    fn default() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}
