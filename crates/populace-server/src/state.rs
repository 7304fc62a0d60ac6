//! Shared application state for the simulation API.

use populace_engine::{CompletionModel, SimulationService};

/// State shared by every request handler.
///
/// Generic over the completion model so tests can serve the real router
/// against an in-process model.
pub struct AppState<M> {
    /// The simulation pipeline.
    pub service: SimulationService<M>,
}

impl<M: CompletionModel> AppState<M> {
    /// Wrap a configured simulation service.
    pub const fn new(service: SimulationService<M>) -> Self {
        Self { service }
    }
}
