//! End-to-end tests of the simulation pipeline against in-test models.
//!
//! Every test runs with paused tokio time, so pacing delays and deadlines
//! advance instantly.

#![allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use populace_engine::{
    BatchOrchestrator, CompletionModel, CompletionRequest, EngineConfig, EngineError,
    ReactionCache, ReactionSimulator, PromptEngine, SimulationService, aggregate,
    fallback_reaction,
};
use populace_population::PopulationGenerator;
use populace_types::{
    DecisionAnalysis, Individual, IndividualId, PopulationParameters, Reaction, ReactionType,
    RevenueImpact, RiskLevel,
};
use tokio::time::{Instant, sleep};

// ---------------------------------------------------------------------------
// Test models
// ---------------------------------------------------------------------------

/// Echoes the individual's id back as reasoning, after a latency derived
/// from that id so completion order differs from input order.
#[derive(Default)]
struct EchoModel {
    calls: AtomicUsize,
}

fn profile_id(prompt: &str) -> String {
    let marker = "\"id\": \"";
    let start = prompt.find(marker).unwrap() + marker.len();
    let rest = &prompt[start..];
    rest[..rest.find('"').unwrap()].to_owned()
}

impl CompletionModel for EchoModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let id = profile_id(&request.user);
        let jitter = id.bytes().last().map_or(0, |b| u64::from(b % 16));
        sleep(Duration::from_millis(jitter * 25)).await;
        Ok(format!(
            r#"Here is my take: {{"reaction_type": "positive", "reaction_strength": 0.6, "reasoning": "{id}", "likelihood_to_act": 0.4}}"#
        ))
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Returns the same reply for every call.
struct FixedModel(String);

impl CompletionModel for FixedModel {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, EngineError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Answers analysis calls with a valid analysis and reaction calls with a
/// negative reaction.
#[derive(Default)]
struct ServiceModel {
    analysis_calls: AtomicUsize,
    reaction_calls: AtomicUsize,
}

impl CompletionModel for ServiceModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, EngineError> {
        if request.max_tokens == populace_engine::analyzer::ANALYSIS_MAX_TOKENS {
            self.analysis_calls.fetch_add(1, Ordering::SeqCst);
            Ok(r#"```json
{
  "decision_type": "pricing",
  "key_factors": ["20% price increase"],
  "target_demographics": ["existing subscribers"],
  "psychological_triggers": ["loss aversion", "fairness"],
  "potential_reactions": {"positive": "few", "negative": "many", "neutral": "some"},
  "decision_parameters": {"price_change_percent": 20},
  "risk_level": "high",
  "confidence_score": 80,
  "reasoning": "Price increases are felt as losses.",
}
```"#
                .to_owned())
        } else {
            self.reaction_calls.fetch_add(1, Ordering::SeqCst);
            Ok(r#"{"reaction_type": "Negative", "reaction_strength": "0.9", "likelihood_to_act": 0.8, "behavioral_change": {"action": "cancel"}}"#.to_owned())
        }
    }

    fn name(&self) -> &str {
        "service"
    }
}

/// Tracks how many calls are in flight at once.
#[derive(Default)]
struct GaugeModel {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl CompletionModel for GaugeModel {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, EngineError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        sleep(Duration::from_millis(50)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(r#"{"reaction_type": "neutral"}"#.to_owned())
    }

    fn name(&self) -> &str {
        "gauge"
    }
}

/// Fails every call.
struct DownModel;

impl CompletionModel for DownModel {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, EngineError> {
        Err(EngineError::LlmBackend("connection refused".to_owned()))
    }

    fn name(&self) -> &str {
        "down"
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn population(size: usize) -> Vec<Individual> {
    PopulationGenerator::new(PopulationParameters::default()).generate_seeded(size, Some(11))
}

fn analysis(risk_level: RiskLevel) -> DecisionAnalysis {
    DecisionAnalysis {
        decision_type: "pricing".to_owned(),
        key_factors: vec!["price".to_owned()],
        target_demographics: Vec::new(),
        psychological_triggers: vec!["loss aversion".to_owned()],
        potential_reactions: BTreeMap::new(),
        decision_parameters: BTreeMap::new(),
        risk_level,
        confidence_score: 0.8,
        reasoning: String::new(),
    }
}

fn quiet_config() -> EngineConfig {
    EngineConfig {
        rate_limit_delay: Duration::ZERO,
        batch_pause: Duration::from_secs(1),
        ..EngineConfig::default()
    }
}

fn orchestrator<M: CompletionModel>(model: Arc<M>, config: &EngineConfig) -> BatchOrchestrator<M> {
    let simulator = ReactionSimulator::new(
        model,
        Arc::new(PromptEngine::builtin().unwrap()),
        Arc::new(ReactionCache::new(config.reaction_cache_capacity, config.cache_ttl)),
        config,
    );
    BatchOrchestrator::new(simulator, config.max_concurrent_calls, config.batch_pause)
}

fn reaction(reaction_type: ReactionType, strength: f64) -> Reaction {
    Reaction {
        individual_id: IndividualId::new(),
        reaction_type,
        reaction_strength: strength,
        reasoning: String::new(),
        behavioral_change: BTreeMap::new(),
        likelihood_to_act: 0.5,
    }
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn reactions_keep_input_order_despite_latency_variance() {
    let config = quiet_config();
    let model = Arc::new(EchoModel::default());
    let orchestrator = orchestrator(Arc::clone(&model), &config);
    let people = population(10);

    let run = orchestrator
        .run(&people, &analysis(RiskLevel::Low), 3)
        .await
        .unwrap();

    assert_eq!(run.reactions.len(), 10);
    for (person, reaction) in people.iter().zip(&run.reactions) {
        assert_eq!(reaction.individual_id, person.id);
        assert_eq!(reaction.reasoning, person.id.to_string());
    }
    assert_eq!(run.stats.batches, 4);
    assert_eq!(run.stats.external_calls, 10);
    assert_eq!(model.calls.load(Ordering::SeqCst), 10);
}

#[tokio::test(start_paused = true)]
async fn pause_follows_every_batch_but_the_last_even_on_cache_hits() {
    let config = quiet_config();
    let model = Arc::new(FixedModel(r#"{"reaction_type": "neutral"}"#.to_owned()));
    let orchestrator = orchestrator(model, &config);
    let people = population(10);

    let started = Instant::now();
    orchestrator
        .run(&people, &analysis(RiskLevel::Low), 3)
        .await
        .unwrap();
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));

    // Second pass is all cache hits and still pauses between batches.
    let started = Instant::now();
    let run = orchestrator
        .run(&people, &analysis(RiskLevel::Low), 3)
        .await
        .unwrap();
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));
    assert_eq!(run.stats.cache_hits, 10);
    assert_eq!(run.stats.external_calls, 0);
}

#[tokio::test(start_paused = true)]
async fn in_flight_calls_never_exceed_the_concurrency_limit() {
    let config = EngineConfig {
        max_concurrent_calls: 2,
        ..quiet_config()
    };
    let model = Arc::new(GaugeModel::default());
    let orchestrator = orchestrator(Arc::clone(&model), &config);

    let run = orchestrator
        .run(&population(10), &analysis(RiskLevel::Low), 10)
        .await
        .unwrap();

    assert_eq!(run.reactions.len(), 10);
    assert_eq!(run.stats.batches, 1);
    assert_eq!(model.peak.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn simulation_runs_on_a_spawned_task() {
    let service = Arc::new(
        SimulationService::new(Arc::new(ServiceModel::default()), quiet_config()).unwrap(),
    );
    let people = population(3);

    let task = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.run_simulation("Raise prices", &people).await })
    };
    let report = task.await.unwrap().unwrap();

    assert_eq!(report.results.total_population, 3);
    assert_eq!(report.stats.external_calls, 3);
}

#[tokio::test(start_paused = true)]
async fn failing_model_degrades_every_reaction_to_fallback() {
    let config = quiet_config();
    let orchestrator = orchestrator(Arc::new(DownModel), &config);
    let people = population(4);

    let run = orchestrator
        .run(&people, &analysis(RiskLevel::Low), 50)
        .await
        .unwrap();

    assert_eq!(run.stats.fallbacks, 4);
    for (person, reaction) in people.iter().zip(&run.reactions) {
        assert_eq!(reaction, &fallback_reaction(person.id));
    }
}

#[tokio::test(start_paused = true)]
async fn out_of_range_scores_are_clamped() {
    let config = quiet_config();
    let model = Arc::new(FixedModel(
        r#"{"reaction_type": "positive", "reaction_strength": 1.5, "likelihood_to_act": -0.2}"#
            .to_owned(),
    ));
    let orchestrator = orchestrator(model, &config);

    let run = orchestrator
        .run(&population(2), &analysis(RiskLevel::Low), 5)
        .await
        .unwrap();
    for reaction in &run.reactions {
        assert_eq!(reaction.reaction_strength, 1.0);
        assert_eq!(reaction.likelihood_to_act, 0.0);
    }
}

#[tokio::test(start_paused = true)]
async fn empty_population_and_zero_batch_are_rejected() {
    let config = quiet_config();
    let orchestrator = orchestrator(Arc::new(DownModel), &config);

    let err = orchestrator
        .run(&[], &analysis(RiskLevel::Low), 5)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::EmptyPopulation));

    let err = orchestrator
        .run(&population(1), &analysis(RiskLevel::Low), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[test]
fn aggregation_of_mixed_reactions() {
    let mut reactions = Vec::new();
    reactions.extend([0.8, 0.8, 0.8, 0.5, 0.5, 0.5].map(|s| reaction(ReactionType::Positive, s)));
    reactions.extend([0.9, 0.9, 0.9].map(|s| reaction(ReactionType::Negative, s)));
    reactions.push(reaction(ReactionType::Neutral, 0.5));

    let result = aggregate(&reactions, &analysis(RiskLevel::Medium)).unwrap();

    assert_eq!(result.total_population, 10);
    assert_eq!(result.reactions_summary.positive, 6);
    assert_eq!(result.reactions_summary.negative, 3);
    assert_eq!(result.reactions_summary.neutral, 1);
    // (2.4 + 1.5 + 2.7 + 0.5) / 10
    assert_eq!(result.average_reaction_strength, 0.71);
    assert_eq!(result.behavioral_segments.strong_supporters, 3);
    assert_eq!(result.behavioral_segments.moderate_supporters, 3);
    assert_eq!(result.behavioral_segments.strong_opponents, 3);
    assert_eq!(result.behavioral_segments.moderate_opponents, 0);
    assert_eq!(result.behavioral_segments.indifferent, 1);
    // (2.4 + 1.5 - 2.7) / 10
    assert_eq!(result.predicted_outcomes.net_sentiment_score, 0.12);
    assert_eq!(result.predicted_outcomes.churn_risk, 0.0);
    assert!((result.predicted_outcomes.predicted_adoption_rate - 56.0).abs() < 1e-9);
    assert_eq!(result.predicted_outcomes.revenue_impact, RevenueImpact::Neutral);
    assert_eq!(
        result.key_insights,
        vec!["Mixed reactions with no clear consensus".to_owned()]
    );
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn service_runs_end_to_end() {
    let model = Arc::new(ServiceModel::default());
    let config = EngineConfig {
        default_batch_size: 2,
        ..quiet_config()
    };
    let service = SimulationService::new(Arc::clone(&model), config).unwrap();
    let people = service
        .generate_population(5, PopulationParameters::default(), Some(5))
        .unwrap();

    let report = service
        .run_simulation("Raise the monthly price by 20%", &people)
        .await
        .unwrap();

    assert_eq!(report.decision_analysis.decision_type, "pricing");
    assert_eq!(report.decision_analysis.confidence_score, 0.8);
    assert_eq!(report.decision_analysis.risk_level, RiskLevel::High);
    assert_eq!(report.results.total_population, 5);
    assert_eq!(report.results.reactions_summary.negative, 5);
    assert_eq!(report.results.behavioral_segments.strong_opponents, 5);
    assert_eq!(report.results.predicted_outcomes.revenue_impact, RevenueImpact::Negative);
    assert_eq!(
        report.results.key_insights,
        vec![
            "Strong overall opposition (100.0% negative reactions)".to_owned(),
            "High action potential: 100.0% likely to act on their reaction".to_owned(),
            "⚠️ High-risk decision with significant negative sentiment".to_owned(),
        ]
    );
    assert_eq!(report.stats.external_calls, 5);
    assert_eq!(report.stats.batches, 3);
    assert!(report.finished_at >= report.started_at);

    // Repeating the run hits both caches.
    let again = service
        .run_simulation("Raise the monthly price by 20%", &people)
        .await
        .unwrap();
    assert_eq!(again.stats.cache_hits, 5);
    assert_eq!(again.stats.external_calls, 0);
    assert_eq!(model.analysis_calls.load(Ordering::SeqCst), 1);
    assert_eq!(model.reaction_calls.load(Ordering::SeqCst), 5);
}

#[tokio::test(start_paused = true)]
async fn service_rejects_missing_inputs() {
    let service = SimulationService::new(Arc::new(ServiceModel::default()), quiet_config()).unwrap();

    let err = service.run_simulation("Raise prices", &[]).await.unwrap_err();
    assert!(err.is_caller_error());

    let err = service.analyze_decision("   ").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = service
        .generate_population(0, PopulationParameters::default(), None)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test(start_paused = true)]
async fn service_caps_population_size() {
    let config = EngineConfig {
        max_population_size: 8,
        ..quiet_config()
    };
    let service = SimulationService::new(Arc::new(ServiceModel::default()), config).unwrap();
    let people = service
        .generate_population(50, PopulationParameters::default(), Some(1))
        .unwrap();
    assert_eq!(people.len(), 8);
}

#[tokio::test(start_paused = true)]
async fn analyzer_surfaces_model_failures() {
    let service = SimulationService::new(Arc::new(DownModel), quiet_config()).unwrap();
    let err = service.analyze_decision("Drop the free tier").await.unwrap_err();
    assert!(err.is_upstream_error());
}

#[tokio::test(start_paused = true)]
async fn unparseable_analysis_becomes_fallback() {
    let model = Arc::new(FixedModel("I cannot analyze this.".to_owned()));
    let service = SimulationService::new(model, quiet_config()).unwrap();
    let analysis = service.analyze_decision("Drop the free tier").await.unwrap();
    assert_eq!(analysis.decision_type, "unknown");
    assert_eq!(analysis.confidence_score, 0.3);
    assert_eq!(
        analysis.reasoning,
        "Analysis parsing failed. Raw response: I cannot analyze this...."
    );
}
