//! Per-individual reaction simulation.
//!
//! For one individual and one decision analysis the simulator:
//! 1. Fingerprints the pair and consults the reaction cache
//! 2. On a miss, renders the role-play prompt
//! 3. Calls the completion model under the per-call deadline
//! 4. Waits the rate-limit delay
//! 5. Parses and validates the response, fills defaults, clamps scores
//! 6. Caches and returns the reaction
//!
//! Any failure along the way (rendering, transport, deadline, parsing)
//! yields the deterministic fallback reaction instead of an error. No call
//! is retried.

use std::sync::Arc;
use std::time::Duration;

use populace_types::{DecisionAnalysis, Individual, IndividualId, Reaction, ReactionType};
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, warn};

use crate::cache::{TtlLruCache, fingerprint};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::llm::{CompletionModel, CompletionRequest};
use crate::parse::parse_reaction;
use crate::prompt::PromptEngine;
use crate::stats::SimulationCounters;

/// Sampling temperature for reaction calls.
pub const REACTION_TEMPERATURE: f64 = 0.4;

/// Output bound for reaction calls.
pub const REACTION_MAX_TOKENS: u32 = 800;

/// Strength of the fallback reaction.
pub const FALLBACK_STRENGTH: f64 = 0.5;

/// Likelihood to act of the fallback reaction.
pub const FALLBACK_LIKELIHOOD: f64 = 0.3;

/// Reasoning of the fallback reaction.
pub const FALLBACK_REASONING: &str = "Unable to determine specific reaction";

/// Cache of reactions keyed by individual + analysis fingerprint.
pub type ReactionCache = TtlLruCache<String, Reaction>;

/// The deterministic reaction used when simulation fails.
pub fn fallback_reaction(individual_id: IndividualId) -> Reaction {
    Reaction {
        individual_id,
        reaction_type: ReactionType::Neutral,
        reaction_strength: FALLBACK_STRENGTH,
        reasoning: FALLBACK_REASONING.to_owned(),
        behavioral_change: std::collections::BTreeMap::new(),
        likelihood_to_act: FALLBACK_LIKELIHOOD,
    }
}

/// Simulates individual reactions against a completion model.
pub struct ReactionSimulator<M> {
    model: Arc<M>,
    prompts: Arc<PromptEngine>,
    cache: Arc<ReactionCache>,
    counters: SimulationCounters,
    rate_limit_delay: Duration,
    call_timeout: Duration,
}

impl<M: CompletionModel> ReactionSimulator<M> {
    /// Create a simulator that takes its pacing and deadline from `config`.
    pub fn new(
        model: Arc<M>,
        prompts: Arc<PromptEngine>,
        cache: Arc<ReactionCache>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            model,
            prompts,
            cache,
            counters: SimulationCounters::new(),
            rate_limit_delay: config.rate_limit_delay,
            call_timeout: config.call_timeout,
        }
    }

    /// Activity counters for this simulator.
    pub const fn counters(&self) -> &SimulationCounters {
        &self.counters
    }

    /// The reaction cache shared by this simulator.
    pub fn cache(&self) -> &ReactionCache {
        &self.cache
    }

    /// Predict one individual's reaction. Never fails.
    pub async fn simulate(&self, individual: &Individual, analysis: &DecisionAnalysis) -> Reaction {
        let key = match fingerprint(individual, analysis) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(individual_id = %individual.id, error = %e, "failed to fingerprint reaction inputs");
                None
            }
        };

        if let Some(cached) = key.as_ref().and_then(|k| self.cache.get(k)) {
            self.counters.record_cache_hit();
            debug!(individual_id = %individual.id, "reaction cache hit");
            return cached;
        }

        match self.simulate_uncached(individual, analysis).await {
            Ok(reaction) => {
                if let Some(key) = key {
                    self.cache.put(key, reaction.clone());
                }
                reaction
            }
            Err(e) => {
                warn!(
                    individual_id = %individual.id,
                    error = %e,
                    "reaction simulation failed, using fallback"
                );
                self.counters.record_fallback();
                fallback_reaction(individual.id)
            }
        }
    }

    async fn simulate_uncached(
        &self,
        individual: &Individual,
        analysis: &DecisionAnalysis,
    ) -> Result<Reaction, EngineError> {
        let prompt = self.prompts.render_reaction(individual, analysis)?;
        let request = CompletionRequest {
            system: prompt.system,
            user: prompt.user,
            temperature: REACTION_TEMPERATURE,
            max_tokens: REACTION_MAX_TOKENS,
        };

        self.counters.record_external_call();
        let started = Instant::now();
        let outcome = timeout(self.call_timeout, self.model.complete(&request)).await;
        let latency_ms = started.elapsed().as_millis();

        sleep(self.rate_limit_delay).await;

        let raw = match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(e),
            Err(_elapsed) => return Err(EngineError::Timeout(self.call_timeout.as_millis())),
        };

        debug!(
            individual_id = %individual.id,
            backend = self.model.name(),
            latency_ms,
            "reaction call completed"
        );

        Ok(parse_reaction(&raw)?.into_reaction(individual.id))
    }
}
