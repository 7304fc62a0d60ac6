//! Axum router construction for the simulation API.
//!
//! Assembles all routes into a single [`Router`] with CORS enabled for
//! cross-origin dashboard access and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use populace_engine::CompletionModel;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /api/health` -- liveness and backend name
/// - `GET /api/decision-categories` -- decision category list
/// - `POST /api/analyze-decision` -- decision analysis
/// - `POST /api/generate-population` -- population generation
/// - `POST /api/run-simulation` -- full simulation run
///
/// CORS allows any origin.
pub fn build_router<M: CompletionModel + 'static>(state: Arc<AppState<M>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health::<M>))
        .route(
            "/api/decision-categories",
            get(handlers::decision_categories),
        )
        .route(
            "/api/analyze-decision",
            post(handlers::analyze_decision::<M>),
        )
        .route(
            "/api/generate-population",
            post(handlers::generate_population::<M>),
        )
        .route("/api/run-simulation", post(handlers::run_simulation::<M>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
