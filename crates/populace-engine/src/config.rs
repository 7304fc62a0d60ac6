//! Configuration types for the simulation engine.
//!
//! All configuration is loaded from environment variables. The engine needs
//! to know which LLM backend to call (URL, API key, model), how large
//! populations may be, and how to pace, cache and bound external calls.

use std::str::FromStr;
use std::time::Duration;

use crate::error::EngineError;

/// Complete engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// LLM backend configuration. `None` only for embedded and test use,
    /// where the caller supplies its own completion model.
    pub backend: Option<LlmBackendConfig>,
    /// Upper bound applied to requested population sizes.
    pub max_population_size: usize,
    /// Number of individuals per orchestrator batch.
    pub default_batch_size: usize,
    /// Maximum concurrent simulator calls within one batch.
    pub max_concurrent_calls: usize,
    /// Time-to-live of cached reactions and analyses.
    pub cache_ttl: Duration,
    /// Capacity of the reaction cache.
    pub reaction_cache_capacity: usize,
    /// Capacity of the decision-analysis cache.
    pub analysis_cache_capacity: usize,
    /// Delay applied after each external reaction call.
    pub rate_limit_delay: Duration,
    /// Pause between consecutive batches.
    pub batch_pause: Duration,
    /// Deadline for a single external call.
    pub call_timeout: Duration,
    /// Optional directory whose `*.j2` files override built-in prompts.
    pub templates_dir: Option<String>,
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// The backend type (openai, anthropic, ollama).
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

/// Supported LLM backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible API (works with `OpenAI`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API (different request format).
    Anthropic,
}

impl FromStr for BackendType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(EngineError::Config(format!("unknown backend type: {other}"))),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: None,
            max_population_size: 10_000,
            default_batch_size: 50,
            max_concurrent_calls: 5,
            cache_ttl: Duration::from_secs(3600),
            reaction_cache_capacity: 5000,
            analysis_cache_capacity: 1000,
            rate_limit_delay: Duration::from_millis(200),
            batch_pause: Duration::from_millis(1000),
            call_timeout: Duration::from_millis(30_000),
            templates_dir: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `LLM_BACKEND` -- backend type (`openai`, `deepseek`, `ollama`, `anthropic`, `claude`)
    /// - `LLM_API_URL` -- API base URL
    /// - `LLM_API_KEY` -- API key
    /// - `LLM_MODEL` -- model name
    ///
    /// Optional variables:
    /// - `MAX_POPULATION_SIZE` -- population size cap (default 10000)
    /// - `DEFAULT_BATCH_SIZE` -- individuals per batch (default 50)
    /// - `MAX_CONCURRENT_CALLS` -- concurrent calls per batch (default 5)
    /// - `CACHE_TTL` -- cache time-to-live in seconds (default 3600)
    /// - `REACTION_CACHE_CAPACITY` -- reaction cache entries (default 5000)
    /// - `ANALYSIS_CACHE_CAPACITY` -- analysis cache entries (default 1000)
    /// - `RATE_LIMIT_DELAY_MS` -- delay after each reaction call (default 200)
    /// - `BATCH_PAUSE_MS` -- pause between batches (default 1000)
    /// - `CALL_TIMEOUT_MS` -- deadline per external call (default 30000)
    /// - `PROMPT_TEMPLATES_DIR` -- prompt override directory (default unset)
    pub fn from_env() -> Result<Self, EngineError> {
        let defaults = Self::default();
        let backend = load_backend_config("LLM")?;

        let config = Self {
            backend: Some(backend),
            max_population_size: env_or("MAX_POPULATION_SIZE", defaults.max_population_size)?,
            default_batch_size: env_or("DEFAULT_BATCH_SIZE", defaults.default_batch_size)?,
            max_concurrent_calls: env_or("MAX_CONCURRENT_CALLS", defaults.max_concurrent_calls)?,
            cache_ttl: Duration::from_secs(env_or("CACHE_TTL", 3600)?),
            reaction_cache_capacity: env_or(
                "REACTION_CACHE_CAPACITY",
                defaults.reaction_cache_capacity,
            )?,
            analysis_cache_capacity: env_or(
                "ANALYSIS_CACHE_CAPACITY",
                defaults.analysis_cache_capacity,
            )?,
            rate_limit_delay: Duration::from_millis(env_or("RATE_LIMIT_DELAY_MS", 200)?),
            batch_pause: Duration::from_millis(env_or("BATCH_PAUSE_MS", 1000)?),
            call_timeout: Duration::from_millis(env_or("CALL_TIMEOUT_MS", 30_000)?),
            templates_dir: std::env::var("PROMPT_TEMPLATES_DIR").ok(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall or divide by zero.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.default_batch_size == 0 {
            return Err(EngineError::Config("DEFAULT_BATCH_SIZE must be positive".to_owned()));
        }
        if self.max_concurrent_calls == 0 {
            return Err(EngineError::Config(
                "MAX_CONCURRENT_CALLS must be positive".to_owned(),
            ));
        }
        if self.max_population_size == 0 {
            return Err(EngineError::Config(
                "MAX_POPULATION_SIZE must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Read a required environment variable.
fn env_var(name: &str) -> Result<String, EngineError> {
    std::env::var(name)
        .map_err(|e| EngineError::Config(format!("missing required env var {name}: {e}")))
}

/// Read an optional environment variable, parsing it or falling back to
/// `default` when unset.
fn env_or<T>(name: &str, default: T) -> Result<T, EngineError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| EngineError::Config(format!("invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Load an LLM backend config from a set of prefixed environment variables.
fn load_backend_config(prefix: &str) -> Result<LlmBackendConfig, EngineError> {
    let backend_type: BackendType = env_var(&format!("{prefix}_BACKEND"))?.parse()?;
    let api_url = env_var(&format!("{prefix}_API_URL"))?;
    let api_key = env_var(&format!("{prefix}_API_KEY"))?;
    let model = env_var(&format!("{prefix}_MODEL"))?;

    Ok(LlmBackendConfig {
        backend_type,
        api_url: api_url.trim_end_matches('/').to_owned(),
        api_key,
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_type_parsing() {
        assert_eq!("openai".parse::<BackendType>().ok(), Some(BackendType::OpenAi));
        assert_eq!("Ollama".parse::<BackendType>().ok(), Some(BackendType::OpenAi));
        assert_eq!("claude".parse::<BackendType>().ok(), Some(BackendType::Anthropic));
        assert!("gemini".parse::<BackendType>().is_err());
    }

    #[test]
    fn engine_config_defaults() {
        let config = EngineConfig::default();
        assert!(config.backend.is_none());
        assert_eq!(config.max_population_size, 10_000);
        assert_eq!(config.default_batch_size, 50);
        assert_eq!(config.max_concurrent_calls, 5);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.reaction_cache_capacity, 5000);
        assert_eq!(config.analysis_cache_capacity, 1000);
        assert_eq!(config.rate_limit_delay, Duration::from_millis(200));
        assert_eq!(config.batch_pause, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = EngineConfig {
            default_batch_size: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn unset_optional_variable_uses_default() {
        let value: usize = env_or("POPULACE_TEST_SURELY_UNSET_VARIABLE", 17).unwrap_or(0);
        assert_eq!(value, 17);
    }
}
