// --- File: crates/counselify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- Booking Engine Settings ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BookingSettings {
    /// Length of one bookable slot in minutes.
    pub slot_length_minutes: u32,
    /// How many days ahead of today the date picker allows.
    pub booking_horizon_days: i64,
    /// Number of quick-pick date shortcuts.
    pub quick_pick_count: usize,
    /// Skip dates that are fully blocked when building quick picks.
    pub quick_picks_skip_fully_unavailable: bool,
    /// Office start used when a counselor profile has none.
    pub default_office_start: String,
    /// Office end used when a counselor profile has none.
    pub default_office_end: String,
    pub submit_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    /// Namespace for scratch storage keys: "{prefix}:{counselor_id}:date".
    pub storage_key_prefix: String,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            slot_length_minutes: 30,
            booking_horizon_days: 90,
            quick_pick_count: 3,
            quick_picks_skip_fully_unavailable: false,
            default_office_start: "09:00".to_string(),
            default_office_end: "18:00".to_string(),
            submit_timeout_secs: 15,
            fetch_timeout_secs: 10,
            storage_key_prefix: "booking".to_string(),
        }
    }
}

// --- Counselor API Config ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String, // Mandatory, e.g. COUNSELIFY_API__BASE_URL
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub booking: BookingSettings,

    // --- Optional: without it the engine runs against in-memory services ---
    #[serde(default)]
    pub api: Option<ApiConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}
