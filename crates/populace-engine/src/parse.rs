//! Model response parsing into validated reaction records.
//!
//! Parsing is split into two visible steps. [`parse_reaction`] is strict:
//! it locates the JSON object in the raw text, deserializes it, and
//! type-checks every field it finds, failing with [`EngineError::Parse`]
//! on anything it cannot interpret. [`ParsedReaction::into_reaction`] then
//! fills the fields the model left out with documented defaults and clamps
//! the scores into `[0.0, 1.0]`.

use std::collections::BTreeMap;

use populace_types::{IndividualId, Reaction, ReactionType};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::EngineError;

/// Strength used when the model omits `reaction_strength`.
pub const DEFAULT_STRENGTH: f64 = 0.5;

/// Likelihood used when the model omits `likelihood_to_act`.
pub const DEFAULT_LIKELIHOOD: f64 = 0.5;

/// Reasoning used when the model omits `reasoning`.
pub const DEFAULT_REASONING: &str = "No reasoning provided";

/// A reaction whose present fields have been type-checked.
///
/// `None` means the model did not supply the field (or supplied `null`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReaction {
    /// Reaction direction.
    pub reaction_type: Option<ReactionType>,
    /// Raw strength, not yet clamped.
    pub reaction_strength: Option<f64>,
    /// Model explanation.
    pub reasoning: Option<String>,
    /// Actions the individual may take.
    pub behavioral_change: Option<BTreeMap<String, Value>>,
    /// Raw likelihood, not yet clamped.
    pub likelihood_to_act: Option<f64>,
}

impl ParsedReaction {
    /// Fill missing fields with defaults, clamp the scores, and attach
    /// the individual's identifier.
    pub fn into_reaction(self, individual_id: IndividualId) -> Reaction {
        Reaction {
            individual_id,
            reaction_type: self.reaction_type.unwrap_or(ReactionType::Neutral),
            reaction_strength: clamp_unit(self.reaction_strength.unwrap_or(DEFAULT_STRENGTH)),
            reasoning: self
                .reasoning
                .unwrap_or_else(|| DEFAULT_REASONING.to_owned()),
            behavioral_change: self.behavioral_change.unwrap_or_default(),
            likelihood_to_act: clamp_unit(self.likelihood_to_act.unwrap_or(DEFAULT_LIKELIHOOD)),
        }
    }
}

/// Shape of the model's JSON before validation. Every field is optional
/// and untyped so validation can report precise reasons.
#[derive(Debug, Default, serde::Deserialize)]
struct RawReaction {
    #[serde(default)]
    reaction_type: Option<Value>,
    #[serde(default)]
    reaction_strength: Option<Value>,
    #[serde(default)]
    reasoning: Option<Value>,
    #[serde(default)]
    behavioral_change: Option<Value>,
    #[serde(default)]
    likelihood_to_act: Option<Value>,
}

/// Parse and validate a raw model response.
///
/// # Errors
///
/// Returns [`EngineError::Parse`] when no JSON object can be recovered,
/// `reaction_type` is not positive/negative/neutral, a score is neither a
/// number nor a numeric string, `reasoning` is not a string, or
/// `behavioral_change` is not an object.
pub fn parse_reaction(raw: &str) -> Result<ParsedReaction, EngineError> {
    let raw: RawReaction = parse_json_object(raw)?;

    let reaction_type = match non_null(raw.reaction_type) {
        None => None,
        Some(Value::String(label)) => Some(
            ReactionType::from_label(&label)
                .ok_or_else(|| EngineError::Parse(format!("unknown reaction_type: {label}")))?,
        ),
        Some(other) => {
            return Err(EngineError::Parse(format!(
                "reaction_type must be a string, got {other}"
            )));
        }
    };

    let reasoning = match non_null(raw.reasoning) {
        None => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => {
            return Err(EngineError::Parse(format!("reasoning must be a string, got {other}")));
        }
    };

    let behavioral_change = match non_null(raw.behavioral_change) {
        None => None,
        Some(Value::Object(map)) => Some(map.into_iter().collect()),
        Some(other) => {
            return Err(EngineError::Parse(format!(
                "behavioral_change must be an object, got {other}"
            )));
        }
    };

    Ok(ParsedReaction {
        reaction_type,
        reaction_strength: score("reaction_strength", raw.reaction_strength)?,
        reasoning,
        behavioral_change,
        likelihood_to_act: score("likelihood_to_act", raw.likelihood_to_act)?,
    })
}

/// Clamp a score into `[0.0, 1.0]`.
pub const fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn non_null(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

/// Interpret a score given as a JSON number or a numeric string.
fn score(field: &str, value: Option<Value>) -> Result<Option<f64>, EngineError> {
    let parsed = match non_null(value) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(EngineError::Parse(format!("{field} is not a finite number"))),
    }
}

// ---------------------------------------------------------------------------
// JSON recovery
// ---------------------------------------------------------------------------

/// Recover and deserialize the JSON object embedded in model output.
///
/// Narrows to a fenced code block when present, then takes the span from
/// the first `{` to the last `}`. Tries a direct parse, then a parse with
/// trailing commas stripped.
pub(crate) fn parse_json_object<T: DeserializeOwned>(raw: &str) -> Result<T, EngineError> {
    let trimmed = raw.trim();
    let candidate = extract_json_from_codeblock(trimmed).unwrap_or(trimmed);
    let span = extract_json_object(candidate)
        .ok_or_else(|| EngineError::Parse("no JSON object found in response".to_owned()))?;

    match serde_json::from_str::<T>(span) {
        Ok(parsed) => Ok(parsed),
        Err(first) => serde_json::from_str::<T>(&strip_trailing_commas(span))
            .map_err(|_second| EngineError::Parse(format!("invalid JSON object: {first}"))),
    }
}

/// The span from the first `{` to the last `}`, inclusive.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

/// Content of the first fenced code block, if any.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    // Look for ```json ... ``` or ``` ... ```
    let start = text
        .find("```json")
        .map(|i| i.checked_add(7).unwrap_or(i))
        .or_else(|| text.find("```").map(|i| i.checked_add(3).unwrap_or(i)))
        .map(|after_tag| {
            text.get(after_tag..)
                .and_then(|s| s.find('\n'))
                .and_then(|nl| after_tag.checked_add(nl))
                .and_then(|pos| pos.checked_add(1))
                .unwrap_or(after_tag)
        })?;

    let remaining = text.get(start..)?;
    let end = remaining.find("```")?;
    remaining.get(..end).map(str::trim)
}

/// Strip trailing commas before closing braces and brackets (common LLM error).
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == ',' {
            let rest: String = chars.clone().skip_while(|ch| ch.is_whitespace()).take(1).collect();
            if rest == "}" || rest == "]" {
                continue;
            }
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn parse_complete_reaction() {
        let raw = r#"{"reaction_type": "positive", "reaction_strength": 0.8,
            "reasoning": "Good value", "behavioral_change": {"purchase": "more"},
            "likelihood_to_act": 0.6}"#;
        let parsed = parse_reaction(raw).unwrap();
        assert_eq!(parsed.reaction_type, Some(ReactionType::Positive));
        assert_eq!(parsed.reaction_strength, Some(0.8));
        assert_eq!(parsed.reasoning.as_deref(), Some("Good value"));
        assert_eq!(parsed.likelihood_to_act, Some(0.6));
        assert_eq!(
            parsed.behavioral_change.unwrap().get("purchase"),
            Some(&Value::String("more".to_owned()))
        );
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let raw = r#"Sure! Here is the reaction: {"reaction_type": "Negative"} Hope this helps."#;
        let parsed = parse_reaction(raw).unwrap();
        assert_eq!(parsed.reaction_type, Some(ReactionType::Negative));
    }

    #[test]
    fn parse_from_codeblock() {
        let raw = "My prediction:\n\n```json\n{\"reaction_type\": \"neutral\", \"reaction_strength\": 0.2}\n```\n";
        let parsed = parse_reaction(raw).unwrap();
        assert_eq!(parsed.reaction_type, Some(ReactionType::Neutral));
        assert_eq!(parsed.reaction_strength, Some(0.2));
    }

    #[test]
    fn parse_trailing_comma() {
        let raw = r#"{"reaction_type": "positive", "reasoning": "ok",}"#;
        let parsed = parse_reaction(raw).unwrap();
        assert_eq!(parsed.reaction_type, Some(ReactionType::Positive));
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let raw = r#"{"reaction_strength": "0.75", "likelihood_to_act": " 1 "}"#;
        let parsed = parse_reaction(raw).unwrap();
        assert_eq!(parsed.reaction_strength, Some(0.75));
        assert_eq!(parsed.likelihood_to_act, Some(1.0));
    }

    #[test]
    fn invalid_reaction_type_is_rejected() {
        let result = parse_reaction(r#"{"reaction_type": "ambivalent"}"#);
        assert!(matches!(result, Err(EngineError::Parse(_))));
    }

    #[test]
    fn non_numeric_score_is_rejected() {
        let result = parse_reaction(r#"{"reaction_strength": "very strong"}"#);
        assert!(matches!(result, Err(EngineError::Parse(_))));
        let result = parse_reaction(r#"{"likelihood_to_act": "NaN"}"#);
        assert!(matches!(result, Err(EngineError::Parse(_))));
    }

    #[test]
    fn non_object_behavioral_change_is_rejected() {
        let result = parse_reaction(r#"{"behavioral_change": "will cancel"}"#);
        assert!(matches!(result, Err(EngineError::Parse(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_reaction("I would probably be annoyed.").is_err());
        assert!(parse_reaction("").is_err());
        assert!(parse_reaction("} backwards {").is_err());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let id = IndividualId::new();
        let reaction = parse_reaction("{}").unwrap().into_reaction(id);
        assert_eq!(reaction.individual_id, id);
        assert_eq!(reaction.reaction_type, ReactionType::Neutral);
        assert_eq!(reaction.reaction_strength, DEFAULT_STRENGTH);
        assert_eq!(reaction.likelihood_to_act, DEFAULT_LIKELIHOOD);
        assert_eq!(reaction.reasoning, DEFAULT_REASONING);
        assert!(reaction.behavioral_change.is_empty());
    }

    #[test]
    fn nulls_take_defaults() {
        let raw = r#"{"reaction_type": null, "reaction_strength": null, "reasoning": null}"#;
        let reaction = parse_reaction(raw).unwrap().into_reaction(IndividualId::new());
        assert_eq!(reaction.reaction_type, ReactionType::Neutral);
        assert_eq!(reaction.reaction_strength, DEFAULT_STRENGTH);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let raw = r#"{"reaction_type": "positive", "reaction_strength": 1.5, "likelihood_to_act": -0.2}"#;
        let reaction = parse_reaction(raw).unwrap().into_reaction(IndividualId::new());
        assert_eq!(reaction.reaction_strength, 1.0);
        assert_eq!(reaction.likelihood_to_act, 0.0);
    }

    #[test]
    fn extract_json_from_markdown() {
        let text = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_from_codeblock(text), Some("{\"key\": \"value\"}"));
    }

    #[test]
    fn extract_json_from_plain_codeblock() {
        let text = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json_from_codeblock(text), Some("{\"key\": \"value\"}"));
    }

    #[test]
    fn extract_object_spans_first_to_last_brace() {
        let text = "a {\"x\": {\"y\": 1}} b";
        assert_eq!(extract_json_object(text), Some("{\"x\": {\"y\": 1}}"));
        assert_eq!(extract_json_object("no braces"), None);
    }

    #[test]
    fn strip_trailing_commas_basic() {
        assert_eq!(strip_trailing_commas(r#"{"a": 1, "b": 2,}"#), r#"{"a": 1, "b": 2}"#);
        assert_eq!(strip_trailing_commas("[1, 2, 3,\n]"), "[1, 2, 3\n]");
        assert_eq!(strip_trailing_commas(r#"{"a": "x, y"}"#), r#"{"a": "x, y"}"#);
    }
}
