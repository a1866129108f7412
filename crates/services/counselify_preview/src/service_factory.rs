// --- File: crates/services/counselify_preview/src/service_factory.rs ---
use counselify_booking::service::mock::MockCounselorService;
use counselify_booking::service::{CounselorServiceError, HttpCounselorService};
use counselify_config::AppConfig;
use std::sync::Arc;
use tracing::info;

/// The counselor backend the preview talks to.
pub enum CounselorBackend {
    Http(Arc<HttpCounselorService>),
    Mock(Arc<MockCounselorService>),
}

impl CounselorBackend {
    /// Uses the HTTP client when an API base URL is configured, the
    /// in-memory mock otherwise.
    pub fn from_config(config: &AppConfig) -> Result<Self, CounselorServiceError> {
        match &config.api {
            Some(api) if !api.base_url.trim().is_empty() => {
                info!("Using counselor API at {}", api.base_url);
                Ok(CounselorBackend::Http(Arc::new(
                    HttpCounselorService::from_config(api)?,
                )))
            }
            _ => {
                info!("No counselor API configured, using the in-memory backend");
                Ok(CounselorBackend::Mock(Arc::new(MockCounselorService::new())))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CounselorBackend::Http(_) => "http",
            CounselorBackend::Mock(_) => "mock",
        }
    }
}
