//! Behavioral-economics analysis of free-text business decisions.
//!
//! The analyzer turns a decision description into the structured
//! [`DecisionAnalysis`] the reaction simulator consumes. Unlike the
//! simulator it does not mask model failures: a transport error or an
//! expired deadline is returned to the caller. Only an unusable response
//! body degrades to the fallback analysis.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use populace_types::{DecisionAnalysis, RiskLevel};
use serde::Deserialize;
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::cache::{TtlLruCache, fingerprint};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::llm::{CompletionModel, CompletionRequest};
use crate::parse::{clamp_unit, parse_json_object};
use crate::prompt::PromptEngine;

/// Decision categories offered to the model and to API clients.
pub const DECISION_CATEGORIES: [&str; 7] = [
    "pricing",
    "product",
    "marketing",
    "ux",
    "business_model",
    "operations",
    "strategy",
];

/// Sampling temperature for analysis calls.
pub const ANALYSIS_TEMPERATURE: f64 = 0.3;

/// Output bound for analysis calls.
pub const ANALYSIS_MAX_TOKENS: u32 = 2000;

/// Confidence assigned when the model's value is not a number.
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Confidence of the fallback analysis.
const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Characters of the raw response quoted in the fallback reasoning.
const RAW_PREVIEW_CHARS: usize = 200;

/// The fixed list of decision categories.
pub const fn decision_categories() -> &'static [&'static str] {
    &DECISION_CATEGORIES
}

/// Analysis as the model returns it.
///
/// All nine fields must be present, but their shapes are loose: models
/// answer with strings where lists were asked for and with lists where
/// scenario text was asked for. [`RawAnalysis::into_analysis`] coerces
/// each field into the typed record.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    decision_type: Value,
    key_factors: Value,
    target_demographics: Value,
    psychological_triggers: Value,
    potential_reactions: Value,
    decision_parameters: Value,
    risk_level: Value,
    confidence_score: Value,
    reasoning: Value,
}

impl RawAnalysis {
    fn into_analysis(self) -> DecisionAnalysis {
        DecisionAnalysis {
            decision_type: text(self.decision_type),
            key_factors: text_list(self.key_factors),
            target_demographics: text_list(self.target_demographics),
            psychological_triggers: text_list(self.psychological_triggers),
            potential_reactions: object(self.potential_reactions)
                .into_iter()
                .map(|(direction, scenario)| (direction, scenario_text(scenario)))
                .collect(),
            decision_parameters: object(self.decision_parameters),
            risk_level: RiskLevel::from_label(&text(self.risk_level)),
            confidence_score: normalize_confidence(&self.confidence_score),
            reasoning: text(self.reasoning),
        }
    }
}

/// Strings pass through, `null` is empty, anything else is its JSON text.
fn text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A list of texts; a lone scalar becomes a one-item list.
fn text_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().map(text).collect(),
        Value::Null => Vec::new(),
        other => vec![text(other)],
    }
}

/// Scenario text; list-valued scenarios are joined with `; `.
fn scenario_text(value: Value) -> String {
    match value {
        Value::Array(_) => text_list(value).join("; "),
        other => text(other),
    }
}

/// The entries of a JSON object; any other shape is empty.
fn object(value: Value) -> BTreeMap<String, Value> {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    }
}

/// Numbers above 1 are read as percentages; anything non-numeric is 0.5.
fn normalize_confidence(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => clamp_unit(if v > 1.0 { v / 100.0 } else { v }),
        _ => DEFAULT_CONFIDENCE,
    }
}

/// Parse model output into a validated analysis.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] when no JSON object is found or any
/// required field is missing.
pub fn parse_analysis(raw: &str) -> Result<DecisionAnalysis, EngineError> {
    parse_json_object::<RawAnalysis>(raw).map(RawAnalysis::into_analysis)
}

/// The analysis used when a model response cannot be interpreted.
pub fn fallback_analysis(raw_response: &str) -> DecisionAnalysis {
    let preview: String = raw_response.chars().take(RAW_PREVIEW_CHARS).collect();
    let potential_reactions = [
        ("positive", "Some positive reactions expected"),
        ("negative", "Some negative reactions expected"),
        ("neutral", "Mixed reactions likely"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect();

    DecisionAnalysis {
        decision_type: "unknown".to_owned(),
        key_factors: vec!["Unable to parse detailed analysis".to_owned()],
        target_demographics: vec!["General population".to_owned()],
        psychological_triggers: vec!["Various behavioral factors".to_owned()],
        potential_reactions,
        decision_parameters: BTreeMap::new(),
        risk_level: RiskLevel::Medium,
        confidence_score: FALLBACK_CONFIDENCE,
        reasoning: format!("Analysis parsing failed. Raw response: {preview}..."),
    }
}

/// Analyzes decisions with a completion model, caching results.
pub struct DecisionAnalyzer<M> {
    model: Arc<M>,
    prompts: Arc<PromptEngine>,
    cache: TtlLruCache<String, DecisionAnalysis>,
    call_timeout: Duration,
}

impl<M: CompletionModel> DecisionAnalyzer<M> {
    /// Create an analyzer with its own cache sized from `config`.
    pub fn new(model: Arc<M>, prompts: Arc<PromptEngine>, config: &EngineConfig) -> Self {
        Self {
            model,
            prompts,
            cache: TtlLruCache::new(config.analysis_cache_capacity, config.cache_ttl),
            call_timeout: config.call_timeout,
        }
    }

    /// Analyze a decision, optionally with extra context for the model.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidInput`] for empty or whitespace-only text
    /// - [`EngineError::Timeout`] when the model misses the deadline
    /// - [`EngineError::LlmBackend`] when the model call fails
    /// - [`EngineError::Template`] when a prompt fails to render
    pub async fn analyze(
        &self,
        decision: &str,
        decision_context: Option<&Value>,
    ) -> Result<DecisionAnalysis, EngineError> {
        let decision = decision.trim();
        if decision.is_empty() {
            return Err(EngineError::InvalidInput(
                "decision text must not be empty".to_owned(),
            ));
        }

        let key = fingerprint(decision, &decision_context)?;
        if let Some(cached) = self.cache.get(&key) {
            debug!("decision analysis cache hit");
            return Ok(cached);
        }

        let prompt = self
            .prompts
            .render_analysis(decision, decision_context, decision_categories())?;
        let request = CompletionRequest {
            system: prompt.system,
            user: prompt.user,
            temperature: ANALYSIS_TEMPERATURE,
            max_tokens: ANALYSIS_MAX_TOKENS,
        };

        let raw = match timeout(self.call_timeout, self.model.complete(&request)).await {
            Ok(result) => result?,
            Err(_elapsed) => return Err(EngineError::Timeout(self.call_timeout.as_millis())),
        };

        match parse_analysis(&raw) {
            Ok(analysis) => {
                info!(
                    decision_type = %analysis.decision_type,
                    risk_level = analysis.risk_level.as_str(),
                    confidence = analysis.confidence_score,
                    "decision analyzed"
                );
                self.cache.put(key, analysis.clone());
                Ok(analysis)
            }
            Err(e) => {
                warn!(error = %e, "decision analysis unparseable, using fallback");
                Ok(fallback_analysis(&raw))
            }
        }
    }
}
