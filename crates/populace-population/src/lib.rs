//! Synthetic population generation for the Populace simulation.
//!
//! [`AttributeSampler`] draws one individual with demographically
//! correlated attributes; [`PopulationGenerator`] repeats that draw to
//! build a population. Randomness is always passed in explicitly so
//! generation is reproducible under a fixed seed.
//!
//! # Modules
//!
//! - [`tables`] -- Cities, income bands, occupations, candidate lists
//! - [`sampler`] -- Per-individual correlated sampling
//! - [`generator`] -- Population-level generation

pub mod generator;
pub mod sampler;
pub mod tables;

pub use generator::PopulationGenerator;
pub use sampler::AttributeSampler;
