//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::Layer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::normalize_path::NormalizePathLayer;

use crate::auth::require_admin;
use crate::handlers::{
    admin_index, create_participant, delete_participant, get_home_details,
    get_participant_details, get_work_details, health, list_participants,
    list_personal_details, ready, update_participant,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, redact_internal_errors, request_id, request_logging,
    security_headers, RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    // Admin gate runs before every participant handler.
    let participant_routes = Router::new()
        .route("/index", get(admin_index))
        .route("/", get(list_participants).post(create_participant))
        .route("/details", get(list_personal_details))
        .route("/details/:email", get(get_participant_details))
        .route("/work/:email", get(get_work_details))
        .route("/home/:email", get(get_home_details))
        .route("/:email", put(update_participant).delete(delete_participant))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let base_path = state.config.participants_base_path.as_str();
    let participant_routes = if base_path == "/" {
        Router::new().merge(participant_routes)
    } else {
        Router::new().nest(base_path, participant_routes)
    };

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = match metrics_handle {
        Some(handle) => {
            Router::new().route("/metrics", get(move || async move { handle.render() }))
        }
        None => Router::new(),
    };

    let is_production = state.config.is_production();
    let app = Router::new()
        .merge(participant_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn_with_state(
            is_production,
            redact_internal_errors,
        ))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state);

    // Trailing slashes are trimmed before routing, so `/participants/` lists too.
    Router::new().fallback_service(NormalizePathLayer::trim_trailing_slash().layer(app))
}
