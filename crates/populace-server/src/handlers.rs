//! REST API endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/health` | Liveness, version and model backend |
//! | `GET` | `/api/decision-categories` | Fixed decision category list |
//! | `POST` | `/api/analyze-decision` | Analyze a free-text decision |
//! | `POST` | `/api/generate-population` | Generate a synthetic population |
//! | `POST` | `/api/run-simulation` | Analyze a decision and simulate a population |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use populace_engine::{CompletionModel, decision_categories as categories};
use populace_types::{Individual, PopulationParameters};
use serde_json::Value;
use tracing::info;
use validator::{Validate, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

/// Population size used when the request omits one.
pub const DEFAULT_POPULATION_SIZE: usize = 1000;

/// Oldest age a request may ask for.
const MAX_AGE: u32 = 120;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /api/analyze-decision`.
#[derive(Debug, serde::Deserialize, Validate)]
pub struct AnalyzeDecisionRequest {
    /// Free-text description of the business decision.
    #[serde(default)]
    #[validate(length(min = 1, message = "decision is required"))]
    pub decision: String,
}

/// Body of `POST /api/generate-population`.
#[derive(Debug, serde::Deserialize, Validate)]
pub struct GeneratePopulationRequest {
    /// Requested size; capped at the configured maximum.
    #[serde(default = "default_population_size")]
    #[validate(range(min = 1, message = "size must be at least 1"))]
    pub size: usize,
    /// Generation parameters; every field has a default.
    #[serde(default)]
    #[validate(custom(function = "validate_parameters"))]
    pub parameters: PopulationParameters,
    /// Optional seed for reproducible attribute draws.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Body of `POST /api/run-simulation`.
#[derive(Debug, serde::Deserialize, Validate)]
pub struct RunSimulationRequest {
    /// Free-text description of the business decision.
    #[serde(default)]
    #[validate(length(min = 1, message = "decision is required"))]
    pub decision: String,
    /// Population to simulate, usually from `generate-population`.
    #[serde(default)]
    #[validate(length(min = 1, message = "population is required"))]
    pub population: Vec<Individual>,
}

const fn default_population_size() -> usize {
    DEFAULT_POPULATION_SIZE
}

fn validate_parameters(params: &PopulationParameters) -> Result<(), ValidationError> {
    if params.age_min > MAX_AGE || params.age_max > MAX_AGE {
        return Err(ValidationError::new("age_out_of_range")
            .with_message(format!("ages must not exceed {MAX_AGE}").into()));
    }
    Ok(())
}

/// Unwrap a JSON body and run its validation rules.
fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(body) = payload?;
    body.validate()?;
    Ok(body)
}

// ---------------------------------------------------------------------------
// GET endpoints
// ---------------------------------------------------------------------------

/// Report liveness, crate version and the active model backend.
pub async fn health<M: CompletionModel>(State(state): State<Arc<AppState<M>>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": state.service.model_name(),
    }))
}

/// List the decision categories the analyzer classifies into.
pub async fn decision_categories() -> Json<Value> {
    Json(serde_json::json!({ "categories": categories() }))
}

// ---------------------------------------------------------------------------
// POST endpoints
// ---------------------------------------------------------------------------

/// Analyze a decision.
pub async fn analyze_decision<M: CompletionModel>(
    State(state): State<Arc<AppState<M>>>,
    payload: Result<Json<AnalyzeDecisionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = validated(payload)?;
    let analysis = state.service.analyze_decision(&request.decision).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "analysis": analysis,
    })))
}

/// Generate a population.
pub async fn generate_population<M: CompletionModel>(
    State(state): State<Arc<AppState<M>>>,
    payload: Result<Json<GeneratePopulationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = validated(payload)?;
    let population =
        state
            .service
            .generate_population(request.size, request.parameters, request.seed)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "size": population.len(),
        "population": population,
    })))
}

/// Analyze a decision and simulate the given population's reaction.
pub async fn run_simulation<M: CompletionModel>(
    State(state): State<Arc<AppState<M>>>,
    payload: Result<Json<RunSimulationRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = validated(payload)?;
    info!(
        individuals = request.population.len(),
        "simulation requested"
    );
    let report = state
        .service
        .run_simulation(&request.decision, &request.population)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "run_id": report.run_id,
        "decision_analysis": report.decision_analysis,
        "simulation_results": report.results,
        "stats": report.stats,
        "started_at": report.started_at,
        "finished_at": report.finished_at,
    })))
}
