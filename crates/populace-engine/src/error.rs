//! Error types for the simulation engine.
//!
//! Uses `thiserror` for typed errors that surface through the engine
//! pipeline: configuration, prompt rendering, LLM calls, response parsing
//! and caller preconditions. Per-individual failures inside the reaction
//! simulator never escape as errors; they become fallback reactions.

/// Errors that can occur during simulation engine operation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// Failed to load or render a prompt template.
    #[error("template render error: {0}")]
    Template(String),

    /// An LLM backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    LlmBackend(String),

    /// An external call exceeded its deadline.
    #[error("timeout: external call exceeded {0} ms")]
    Timeout(u128),

    /// A model response could not be parsed or validated.
    #[error("response parse error: {0}")]
    Parse(String),

    /// Caller input violated a precondition (empty decision text, zero
    /// population size).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Aggregation or simulation was requested over no individuals.
    #[error("population is empty")]
    EmptyPopulation,

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl EngineError {
    /// Whether the error is a caller precondition failure rather than an
    /// upstream or internal fault.
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::EmptyPopulation)
    }

    /// Whether the error originated in the external model capability.
    pub const fn is_upstream_error(&self) -> bool {
        matches!(self, Self::LlmBackend(_) | Self::Timeout(_))
    }
}
