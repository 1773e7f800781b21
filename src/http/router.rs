//! Router configuration for the timetable submission API (§6).

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new().route(
        "/timetables",
        post(handlers::create_timetable),
    ).route(
        "/timetables/{id}",
        get(handlers::get_timetable)
            .put(handlers::update_timetable)
            .delete(handlers::delete_timetable),
    );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_v1)
        .layer(DefaultBodyLimit::max(50 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use crate::db::TimetableStore;
    use std::sync::Arc;

    #[test]
    fn router_builds() {
        let state = AppState::new(TimetableStore::new(), Arc::new(SchedulerConfig::default()));
        let _router = create_router(state);
    }
}
