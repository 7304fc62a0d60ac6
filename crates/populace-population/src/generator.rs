//! Population generation.
//!
//! A population is `size` independent draws from one
//! [`AttributeSampler`]. Individuals share only the population parameters;
//! output order is generation order.

use populace_types::{Individual, PopulationParameters};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::sampler::AttributeSampler;

/// Builds populations for one set of parameters.
#[derive(Debug, Clone)]
pub struct PopulationGenerator {
    params: PopulationParameters,
}

impl PopulationGenerator {
    /// Create a generator for the given parameters.
    pub const fn new(params: PopulationParameters) -> Self {
        Self { params }
    }

    /// Generate `size` individuals from the supplied random source.
    ///
    /// The caller is responsible for capping `size`.
    pub fn generate(&self, size: usize, rng: &mut impl Rng) -> Vec<Individual> {
        let sampler = AttributeSampler::new(&self.params);
        let population: Vec<Individual> = (0..size).map(|_| sampler.sample(rng)).collect();

        let (age_min, age_max) = self.params.age_bounds();
        info!(
            size,
            age_min,
            age_max,
            region = ?self.params.region,
            "Generated population"
        );
        population
    }

    /// Generate `size` individuals, seeding the random source when `seed`
    /// is given so the attribute draws are reproducible.
    pub fn generate_seeded(&self, size: usize, seed: Option<u64>) -> Vec<Individual> {
        let mut rng = seed.map_or_else(
            || StdRng::from_rng(&mut rand::rng()),
            StdRng::seed_from_u64,
        );
        debug!(seed = ?seed, "Seeded population random source");
        self.generate(size, &mut rng)
    }
}
