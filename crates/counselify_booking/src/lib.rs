// --- File: crates/counselify_booking/src/lib.rs ---
// Declare modules within this crate
pub mod calendar;
pub mod card;
pub mod clock;
pub mod models;
pub mod non_availability;
#[cfg(test)]
mod non_availability_test;
pub mod selection;
pub mod service;
pub mod slots;
#[cfg(test)]
mod slots_midnight_test;
#[cfg(test)]
mod slots_proptest;
pub mod storage;
#[cfg(test)]
mod storage_test;
pub mod time;
pub mod transaction;

pub use card::{BookingCallbacks, BookingCard, CardContext, CardView, ConfirmationView, Outcome};
pub use clock::{Clock, FixedClock, SystemClock};
pub use models::CounselorProfile;
pub use selection::{CompletedSelection, SelectTarget, SelectionState};
pub use transaction::{BookingIntent, ExistingAppointment, TransactionStatus};
