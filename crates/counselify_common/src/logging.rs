//! Logging utilities for the Counselify workspace.
//!
//! This module provides a standardized approach to logging across all crates
//! in the workspace. The engine itself only emits `tracing` events; binaries
//! and tests call [`init`] or [`init_with_level`] once to install a subscriber.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
///
/// # Examples
///
/// ```
/// use counselify_common::logging;
///
/// // Initialize with default log level (INFO)
/// logging::init();
///
/// // A second initialization is a no-op
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Targets of the workspace crates, as they appear in tracing metadata.
pub const CRATE_TARGETS: [&str; 4] = [
    "counselify_booking",
    "counselify_common",
    "counselify_config",
    "counselify_preview",
];

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives are honoured; the level given here is added for the
/// `counselify` crates on top of them.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    for krate in CRATE_TARGETS {
        if let Ok(directive) = format!("{}={}", krate, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    // try_init: a global default subscriber may already be set (tests, embedding apps)
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Parse a level name such as `"debug"` from configuration.
///
/// Unknown names fall back to INFO.
pub fn level_from_str(name: &str) -> Level {
    name.trim().parse::<Level>().unwrap_or(Level::INFO)
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result so it can be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
