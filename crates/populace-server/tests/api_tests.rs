//! Integration tests for the simulation API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server, backed by an in-process completion model.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use populace_engine::{
    CompletionModel, CompletionRequest, EngineConfig, EngineError, SimulationService,
};
use populace_server::{AppState, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

const ANALYSIS: &str = r#"{
  "decision_type": "product",
  "key_factors": ["new feature"],
  "target_demographics": ["power users"],
  "psychological_triggers": ["novelty"],
  "potential_reactions": {"positive": "excited", "negative": "confused", "neutral": "indifferent"},
  "decision_parameters": {},
  "risk_level": "low",
  "confidence_score": 0.9,
  "reasoning": "Additive change."
}"#;

/// Answers analysis prompts with [`ANALYSIS`] and reaction prompts with a
/// strong positive reaction.
struct StubModel;

impl CompletionModel for StubModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, EngineError> {
        if request.system.contains("behavioral econom") {
            Ok(ANALYSIS.to_owned())
        } else {
            Ok(r#"{"reaction_type": "positive", "reaction_strength": 0.9, "reasoning": "Love it", "likelihood_to_act": 0.9}"#.to_owned())
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// A model whose provider is unreachable.
struct UnreachableModel;

impl CompletionModel for UnreachableModel {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, EngineError> {
        Err(EngineError::LlmBackend("connection refused".to_owned()))
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

fn test_config() -> EngineConfig {
    EngineConfig {
        max_population_size: 20,
        rate_limit_delay: Duration::ZERO,
        batch_pause: Duration::ZERO,
        ..EngineConfig::default()
    }
}

fn router_with<M: CompletionModel + 'static>(model: M) -> Router {
    let service = SimulationService::new(Arc::new(model), test_config()).unwrap();
    build_router(Arc::new(AppState::new(service)))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(router: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_health() {
    let response = router_with(StubModel)
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["backend"], "stub");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_decision_categories() {
    let response = router_with(StubModel)
        .oneshot(
            Request::get("/api/decision-categories")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let categories = json["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 7);
    assert_eq!(categories[0], "pricing");
}

#[tokio::test]
async fn test_analyze_decision() {
    let (status, json) = post_json(
        router_with(StubModel),
        "/api/analyze-decision",
        &json!({"decision": "Add dark mode"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["analysis"]["decision_type"], "product");
    assert_eq!(json["analysis"]["risk_level"], "low");
}

#[tokio::test]
async fn test_analyze_decision_requires_text() {
    let (status, json) =
        post_json(router_with(StubModel), "/api/analyze-decision", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (status, _) = post_json(
        router_with(StubModel),
        "/api/analyze-decision",
        &json!({"decision": "   "}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_decision_upstream_failure_is_bad_gateway() {
    let (status, json) = post_json(
        router_with(UnreachableModel),
        "/api/analyze-decision",
        &json!({"decision": "Add dark mode"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["status"], 502);
    assert!(json["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let response = router_with(StubModel)
        .oneshot(
            Request::post("/api/analyze-decision")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_population() {
    let (status, json) = post_json(
        router_with(StubModel),
        "/api/generate-population",
        &json!({"size": 5, "parameters": {"age_min": 30, "age_max": 40, "region": "europe"}, "seed": 9}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["size"], 5);
    for person in json["population"].as_array().unwrap() {
        let age = person["age"].as_u64().unwrap();
        assert!((30..=40).contains(&age));
    }
}

#[tokio::test]
async fn test_generate_population_is_capped() {
    let (status, json) = post_json(
        router_with(StubModel),
        "/api/generate-population",
        &json!({"size": 500}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["size"], 20);
}

#[tokio::test]
async fn test_generate_population_rejects_bad_parameters() {
    let (status, _) = post_json(
        router_with(StubModel),
        "/api/generate-population",
        &json!({"size": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = post_json(
        router_with(StubModel),
        "/api/generate-population",
        &json!({"parameters": {"age_max": 200}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("120"));
}

#[tokio::test]
async fn test_run_simulation() {
    let router = router_with(StubModel);
    let (_, generated) = post_json(
        router.clone(),
        "/api/generate-population",
        &json!({"size": 4, "seed": 1}),
    )
    .await;

    let (status, json) = post_json(
        router,
        "/api/run-simulation",
        &json!({"decision": "Add dark mode", "population": generated["population"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert!(json["run_id"].is_string());
    assert_eq!(json["decision_analysis"]["decision_type"], "product");
    let results = &json["simulation_results"];
    assert_eq!(results["total_population"], 4);
    assert_eq!(results["reactions_summary"]["positive"], 4);
    assert_eq!(results["behavioral_segments"]["strong_supporters"], 4);
    assert_eq!(results["predicted_outcomes"]["revenue_impact"], "positive");
    assert_eq!(json["stats"]["external_calls"], 4);
}

#[tokio::test]
async fn test_run_simulation_requires_population() {
    let (status, json) = post_json(
        router_with(StubModel),
        "/api/run-simulation",
        &json!({"decision": "Add dark mode", "population": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (status, _) = post_json(
        router_with(StubModel),
        "/api/run-simulation",
        &json!({"population": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
