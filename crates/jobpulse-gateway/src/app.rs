use axum::{routing::get, Router};
use jobpulse_core::config::JobpulseConfig;
use jobpulse_ingest::StagingBuffer;
use jobpulse_scheduler::SchedulerHandle;
use jobpulse_store::ListingStore;
use std::sync::Arc;

/// Shared state, passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: JobpulseConfig,
    pub store: Arc<dyn ListingStore>,
    /// Read-only view for /health; the ingest cadences own the writes.
    pub buffer: Arc<StagingBuffer>,
    pub scheduler: SchedulerHandle,
}

impl AppState {
    pub fn new(
        config: JobpulseConfig,
        store: Arc<dyn ListingStore>,
        buffer: Arc<StagingBuffer>,
        scheduler: SchedulerHandle,
    ) -> Self {
        Self {
            config,
            store,
            buffer,
            scheduler,
        }
    }
}

/// The three read endpoints, mounted both at the root and under /api/v1.
fn read_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/vacancies", get(crate::http::vacancies::list_vacancies))
        .route(
            "/vacancies/city-counts",
            get(crate::http::vacancies::city_counts),
        )
        .route(
            "/top-popular-titles",
            get(crate::http::vacancies::popular_titles),
        )
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .merge(read_routes())
        .nest("/api/v1", read_routes())
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
