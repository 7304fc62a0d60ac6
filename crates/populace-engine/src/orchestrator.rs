//! Batch orchestration over a whole population.
//!
//! The population is split into consecutive batches. Within a batch up to
//! `concurrency` simulator calls run at once; results come back in input
//! order regardless of completion order. Batches run strictly one after
//! another with a fixed pause in between.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use populace_types::{DecisionAnalysis, Individual, Reaction, RunStats};
use tokio::time::{Instant, sleep};
use tracing::info;

use crate::error::EngineError;
use crate::llm::CompletionModel;
use crate::simulator::ReactionSimulator;

/// Reactions for a population plus the counters for producing them.
#[derive(Debug, Clone)]
pub struct BatchRun {
    /// One reaction per individual, in input order.
    pub reactions: Vec<Reaction>,
    /// Counters for this run only.
    pub stats: RunStats,
}

/// Drives a [`ReactionSimulator`] over a population in paced batches.
pub struct BatchOrchestrator<M> {
    simulator: ReactionSimulator<M>,
    concurrency: usize,
    batch_pause: Duration,
}

impl<M: CompletionModel> BatchOrchestrator<M> {
    /// Wrap a simulator. A concurrency of zero is treated as one.
    pub fn new(simulator: ReactionSimulator<M>, concurrency: usize, batch_pause: Duration) -> Self {
        Self {
            simulator,
            concurrency: concurrency.max(1),
            batch_pause,
        }
    }

    /// Simulate every individual and return reactions in input order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyPopulation`] for an empty population and
    /// [`EngineError::InvalidInput`] for a zero batch size. Individual
    /// simulation failures never surface here; they become fallback
    /// reactions.
    pub async fn run(
        &self,
        population: &[Individual],
        analysis: &DecisionAnalysis,
        batch_size: usize,
    ) -> Result<BatchRun, EngineError> {
        if population.is_empty() {
            return Err(EngineError::EmptyPopulation);
        }
        if batch_size == 0 {
            return Err(EngineError::InvalidInput(
                "batch size must be at least 1".to_owned(),
            ));
        }

        let started = Instant::now();
        let before = self.simulator.counters().snapshot();
        let total_batches = population.len().div_ceil(batch_size);
        let mut reactions = Vec::with_capacity(population.len());

        for (index, batch) in population.chunks(batch_size).enumerate() {
            let batch_number = index.saturating_add(1);
            info!(
                batch = batch_number,
                total_batches,
                individuals = batch.len(),
                "processing batch"
            );

            let pending: Vec<BoxFuture<'_, Reaction>> = batch
                .iter()
                .map(|individual| self.simulate_boxed(individual, analysis))
                .collect();
            let batch_reactions: Vec<Reaction> = stream::iter(pending)
                .buffered(self.concurrency)
                .collect()
                .await;
            reactions.extend(batch_reactions);

            if batch_number < total_batches {
                sleep(self.batch_pause).await;
            }
        }

        let delta = self.simulator.counters().snapshot().since(before);
        let stats = RunStats {
            external_calls: delta.external_calls,
            cache_hits: delta.cache_hits,
            fallbacks: delta.fallbacks,
            batches: u64::try_from(total_batches).unwrap_or(u64::MAX),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        info!(
            reactions = reactions.len(),
            external_calls = stats.external_calls,
            cache_hits = stats.cache_hits,
            fallbacks = stats.fallbacks,
            elapsed_ms = stats.elapsed_ms,
            "population simulation complete"
        );

        Ok(BatchRun { reactions, stats })
    }

    /// Erase the simulate future behind a `Send` box so the batch stream
    /// stays `Send` for any model type.
    fn simulate_boxed<'a>(
        &'a self,
        individual: &'a Individual,
        analysis: &'a DecisionAnalysis,
    ) -> BoxFuture<'a, Reaction> {
        self.simulator.simulate(individual, analysis).boxed()
    }
}
