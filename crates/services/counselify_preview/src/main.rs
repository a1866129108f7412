// File: services/counselify_preview/src/main.rs
//! Prints what a booking card would show for one counselor.
//!
//! Usage: `counselify-preview [profile.json] [scratch.json]`

mod preview;
mod service_factory;

use counselify_booking::storage::{FileScratchStorage, MemoryScratchStorage, ScratchStorage};
use counselify_booking::{BookingCard, CardContext, CounselorProfile, SystemClock};
use counselify_common::{init_with_level, level_from_str, Context};
use counselify_config::load_config;
use preview::{build_preview, sample_profile, CardPreview};
use service_factory::CounselorBackend;
use std::sync::Arc;
use tracing::info;

fn read_profile(path: &str) -> Result<CounselorProfile, Box<dyn std::error::Error>> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading profile {}", path))?;
    Ok(serde_json::from_str(&contents)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    init_with_level(level_from_str(&config.logging.level));

    let mut args = std::env::args().skip(1);
    let profile = match args.next() {
        Some(path) => read_profile(&path)?,
        None => sample_profile(),
    };
    let storage: Arc<dyn ScratchStorage> = match args.next() {
        Some(path) => Arc::new(FileScratchStorage::new(path)),
        None => Arc::new(MemoryScratchStorage::new()),
    };

    let context = CardContext {
        user_id: "preview".to_string(),
        storage,
        clock: Arc::new(SystemClock),
        settings: config.booking.clone(),
    };

    let backend = CounselorBackend::from_config(&config)?;
    info!("Previewing {} via the {} backend", profile.id, backend.name());
    let preview: CardPreview = match backend {
        CounselorBackend::Http(service) => {
            let mut card = BookingCard::new(profile, context, service.clone(), service);
            build_preview(&mut card).await
        }
        CounselorBackend::Mock(service) => {
            let mut card = BookingCard::new(profile, context, service.clone(), service);
            build_preview(&mut card).await
        }
    };

    println!("{}", serde_json::to_string_pretty(&preview)?);
    Ok(())
}
