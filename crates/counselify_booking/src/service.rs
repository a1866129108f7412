//! Counselor backend client.
//!
//! This module provides a reqwest implementation of the
//! `NonAvailabilityService` and `BookingService` traits, and an in-memory
//! mock used by tests and the preview binary.

use counselify_common::services::{
    BookingPayload, BookingReceipt, BookingService, BoxFuture, NonAvailabilityService,
    RescheduleAck, ReschedulePayload,
};
use counselify_config::ApiConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when talking to the counselor backend.
#[derive(Error, Debug)]
pub enum CounselorServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Counselor service answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Failed to decode response: {0}")]
    Decode(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// HTTP client for the counselor backend.
#[derive(Debug, Clone)]
pub struct HttpCounselorService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCounselorService {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, CounselorServiceError> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, CounselorServiceError> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Reads a JSON body, turning non-2xx answers into `Status` errors that
/// carry the server's `message` field when it sent one.
async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CounselorServiceError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<Value>(&bytes)
            .ok()
            .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        return Err(CounselorServiceError::Status {
            status: status.as_u16(),
            message,
        });
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(Value::Null)
            .map_err(|e| CounselorServiceError::Decode(format!("empty body: {}", e)));
    }
    serde_json::from_slice(&bytes).map_err(|e| CounselorServiceError::Decode(e.to_string()))
}

impl NonAvailabilityService for HttpCounselorService {
    type Error = CounselorServiceError;

    fn fetch_non_availability(
        &self,
        user_id: &str,
        counselor_id: &str,
    ) -> BoxFuture<'_, Value, Self::Error> {
        let url = format!("{}/counselors/{}/non-availability", self.base_url, counselor_id);
        let user_id = user_id.to_string();

        Box::pin(async move {
            debug!("GET {}", url);
            let response = self
                .client
                .get(&url)
                .query(&[("userId", user_id.as_str())])
                .send()
                .await?;
            decode_response(response).await
        })
    }
}

impl BookingService for HttpCounselorService {
    type Error = CounselorServiceError;

    fn submit_booking(&self, payload: BookingPayload) -> BoxFuture<'_, BookingReceipt, Self::Error> {
        let url = format!("{}/bookings", self.base_url);

        Box::pin(async move {
            info!(
                "Booking {} with {} on {} at {}",
                payload.user_id, payload.counselor_id, payload.date, payload.start_time
            );
            let response = self.client.post(&url).json(&payload).send().await?;
            decode_response(response).await
        })
    }

    fn submit_reschedule(
        &self,
        payload: ReschedulePayload,
        auth_token: &str,
    ) -> BoxFuture<'_, RescheduleAck, Self::Error> {
        let url = format!(
            "{}/appointments/{}/reschedule",
            self.base_url, payload.appointment_id
        );
        let auth_token = auth_token.to_string();

        Box::pin(async move {
            info!(
                "Rescheduling {} from {} {} to {} {}",
                payload.appointment_id,
                payload.old_date,
                payload.old_start_time,
                payload.date,
                payload.start_time
            );
            let response = self
                .client
                .put(&url)
                .bearer_auth(&auth_token)
                .json(&payload)
                .send()
                .await?;
            // 204 and other empty 2xx answers are plain acceptances
            let ack: Option<RescheduleAck> = decode_response(response).await?;
            Ok(ack.unwrap_or_default())
        })
    }
}

/// Mock implementation of the counselor backend for testing.
pub mod mock {
    use super::*;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// In-memory counselor backend.
    ///
    /// Serves a fixed non-availability payload, accepts every booking unless
    /// told to fail, and records what it was sent.
    #[derive(Default)]
    pub struct MockCounselorService {
        non_availability: Mutex<Value>,
        failure: Mutex<Option<String>>,
        delay: Mutex<Option<Duration>>,
        fetches: Mutex<Vec<(String, String)>>,
        bookings: Mutex<Vec<BookingPayload>>,
        reschedules: Mutex<Vec<(ReschedulePayload, String)>>,
    }

    impl MockCounselorService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_non_availability(self, payload: Value) -> Self {
            self.set_non_availability(payload);
            self
        }

        pub fn set_non_availability(&self, payload: Value) {
            *lock(&self.non_availability) = payload;
        }

        /// Every following call fails with `message`, until cleared with `None`.
        pub fn set_failure(&self, message: Option<&str>) {
            *lock(&self.failure) = message.map(str::to_string);
        }

        /// Every following call sleeps for `delay` before answering.
        pub fn set_delay(&self, delay: Option<Duration>) {
            *lock(&self.delay) = delay;
        }

        /// (user id, counselor id) of every fetch.
        pub fn fetches(&self) -> Vec<(String, String)> {
            lock(&self.fetches).clone()
        }

        pub fn bookings(&self) -> Vec<BookingPayload> {
            lock(&self.bookings).clone()
        }

        /// Reschedule payloads with the bearer token they were sent with.
        pub fn reschedules(&self) -> Vec<(ReschedulePayload, String)> {
            lock(&self.reschedules).clone()
        }

        async fn pause_and_check(&self) -> Result<(), CounselorServiceError> {
            let delay = *lock(&self.delay);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match lock(&self.failure).clone() {
                Some(message) => Err(CounselorServiceError::Rejected(message)),
                None => Ok(()),
            }
        }
    }

    impl NonAvailabilityService for MockCounselorService {
        type Error = CounselorServiceError;

        fn fetch_non_availability(
            &self,
            user_id: &str,
            counselor_id: &str,
        ) -> BoxFuture<'_, Value, Self::Error> {
            let user_id = user_id.to_string();
            let counselor_id = counselor_id.to_string();

            Box::pin(async move {
                lock(&self.fetches).push((user_id, counselor_id));
                self.pause_and_check().await?;
                Ok(lock(&self.non_availability).clone())
            })
        }
    }

    impl BookingService for MockCounselorService {
        type Error = CounselorServiceError;

        fn submit_booking(
            &self,
            payload: BookingPayload,
        ) -> BoxFuture<'_, BookingReceipt, Self::Error> {
            Box::pin(async move {
                self.pause_and_check().await?;
                lock(&self.bookings).push(payload);
                Ok(BookingReceipt {
                    status: "confirmed".to_string(),
                    booking_id: Some(format!("mock-booking-{}", uuid::Uuid::new_v4())),
                    extra: serde_json::Map::new(),
                })
            })
        }

        fn submit_reschedule(
            &self,
            payload: ReschedulePayload,
            auth_token: &str,
        ) -> BoxFuture<'_, RescheduleAck, Self::Error> {
            let auth_token = auth_token.to_string();

            Box::pin(async move {
                self.pause_and_check().await?;
                lock(&self.reschedules).push((payload, auth_token));
                Ok(RescheduleAck {
                    success: true,
                    message: Some("Appointment rescheduled".to_string()),
                })
            })
        }
    }
}
