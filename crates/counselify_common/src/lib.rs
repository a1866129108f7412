// --- File: crates/counselify_common/src/lib.rs ---

// Declare modules within this crate
pub mod error;    // Error handling
pub mod logging;  // Logging utilities
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    CounselifyError,
    Context,
    parse_error,
    validation_error,
    fetch_error,
    transaction_error,
    timeout_error,
};

// Re-export logging utilities for easier access
pub use logging::{
    init,
    init_with_level,
    level_from_str,
    log_error,
    log_result,
};

// This crate provides the shared pieces used across the workspace:
// the error taxonomy, logging setup, and the remote service seams.
