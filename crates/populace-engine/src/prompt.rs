//! Prompt template loading and rendering via `minijinja`.
//!
//! The four prompt templates ship inside the binary. An operator may point
//! `PROMPT_TEMPLATES_DIR` at a directory holding any subset of
//! `reaction_system.j2`, `reaction_user.j2`, `analysis_system.j2` and
//! `analysis_user.j2`; files found there replace the built-in versions so
//! prompts can be tuned without recompiling.

use std::path::Path;

use minijinja::{Environment, context};
use populace_types::{DecisionAnalysis, Individual};

use crate::error::EngineError;

/// Built-in templates as `(name, source)` pairs.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("reaction_system.j2", include_str!("../templates/reaction_system.j2")),
    ("reaction_user.j2", include_str!("../templates/reaction_user.j2")),
    ("analysis_system.j2", include_str!("../templates/analysis_system.j2")),
    ("analysis_user.j2", include_str!("../templates/analysis_user.j2")),
];

/// Manages prompt template loading and rendering.
///
/// Wraps a `minijinja` [`Environment`] with all prompt templates
/// pre-loaded.
pub struct PromptEngine {
    env: Environment<'static>,
}

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    /// System message establishing the role.
    pub system: String,
    /// User message carrying the individual or decision.
    pub user: String,
}

impl PromptEngine {
    /// Create a prompt engine from the built-in templates, replacing any
    /// that exist in `templates_dir`.
    pub fn new(templates_dir: Option<&str>) -> Result<Self, EngineError> {
        let mut env = Environment::new();

        for (name, builtin) in BUILTIN_TEMPLATES {
            let source = match templates_dir {
                Some(dir) => load_override(dir, name)?.unwrap_or_else(|| (*builtin).to_owned()),
                None => (*builtin).to_owned(),
            };
            env.add_template_owned(*name, source)
                .map_err(|e| EngineError::Template(format!("failed to add {name}: {e}")))?;
        }

        Ok(Self { env })
    }

    /// Create a prompt engine using only the built-in templates.
    pub fn builtin() -> Result<Self, EngineError> {
        Self::new(None)
    }

    /// Render the role-play prompt for one individual reacting to one
    /// decision analysis.
    pub fn render_reaction(
        &self,
        individual: &Individual,
        analysis: &DecisionAnalysis,
    ) -> Result<RenderedPrompt, EngineError> {
        let profile = serde_json::to_string_pretty(individual)?;
        let decision_parameters = serde_json::to_string(&analysis.decision_parameters)?;

        let ctx = context! {
            profile => profile,
            decision_type => analysis.decision_type,
            key_factors => analysis.key_factors,
            decision_parameters => decision_parameters,
            psychological_triggers => analysis.psychological_triggers,
            risk_level => analysis.risk_level.as_str(),
        };

        Ok(RenderedPrompt {
            system: self.render("reaction_system.j2", &ctx)?,
            user: self.render("reaction_user.j2", &ctx)?,
        })
    }

    /// Render the behavioral-economics analysis prompt for a decision.
    pub fn render_analysis(
        &self,
        decision: &str,
        decision_context: Option<&serde_json::Value>,
        categories: &[&str],
    ) -> Result<RenderedPrompt, EngineError> {
        let extra = decision_context.map(serde_json::to_string_pretty).transpose()?;

        let ctx = context! {
            decision => decision,
            context => extra,
            categories => categories,
        };

        Ok(RenderedPrompt {
            system: self.render("analysis_system.j2", &ctx)?,
            user: self.render("analysis_user.j2", &ctx)?,
        })
    }

    fn render(&self, name: &str, ctx: &minijinja::Value) -> Result<String, EngineError> {
        self.env
            .get_template(name)
            .map_err(|e| EngineError::Template(format!("missing {name} template: {e}")))?
            .render(ctx)
            .map_err(|e| EngineError::Template(format!("{name} render failed: {e}")))
    }
}

/// Read an override template if the directory provides one.
fn load_override(dir: &str, filename: &str) -> Result<Option<String>, EngineError> {
    let path = Path::new(dir).join(filename);
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(&path)
        .map(Some)
        .map_err(|e| EngineError::Template(format!("failed to read {}: {e}", path.display())))
}
