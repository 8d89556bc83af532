//! STAR Generation: orchestrates the generation pipeline.
//!
//! Flow: validate → build_star_prompt → provider (primary model, one substitution to the
//!       fallback model if the primary is unavailable) → parse_star_response → echo inputs.
//!
//! The result is NOT persisted here. Saving is a separate, caller-driven step, so a store
//! outage never blocks generation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::parser::{parse_star_response, ParseStrategy};
use crate::generation::prompts::build_star_prompt;
use crate::llm_client::{CompletionParams, CompletionProvider, ProviderErrorKind};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for STAR generation. Fields are optional so that missing input surfaces as
/// a field-level validation error rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub story: Option<String>,
    #[serde(default)]
    pub competency: Option<String>,
    #[serde(default)]
    pub store_category: Option<String>,
}

/// A generated, not-yet-persisted STAR report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub competency: String,
    pub store_category: String,
    pub original_story: String,
}

/// Output of the pipeline: the result plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Generated {
    pub result: GenerationResult,
    pub strategy: ParseStrategy,
    /// Model that actually produced the text (primary or fallback).
    pub model: String,
    /// Raw provider text, present only when the parse was degraded.
    pub raw_response: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GenerationService {
    provider: Arc<dyn CompletionProvider>,
    primary_model: String,
    fallback_model: Option<String>,
    params: CompletionParams,
}

impl GenerationService {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        primary_model: String,
        fallback_model: Option<String>,
        params: CompletionParams,
    ) -> Self {
        // Substituting a model with itself would be a blind retry.
        let fallback_model = fallback_model.filter(|m| !m.is_empty() && *m != primary_model);
        Self {
            provider,
            primary_model,
            fallback_model,
            params,
        }
    }

    /// Runs the generation pipeline.
    ///
    /// Steps:
    /// 1. validate that story, competency and storeCategory are present
    /// 2. build_star_prompt()
    /// 3. provider call with the primary model
    /// 4. on ModelUnavailable only: one call with the fallback model
    /// 5. parse_star_response() and echo the inputs onto the result
    pub async fn generate(&self, request: GenerateRequest) -> Result<Generated, AppError> {
        // Step 1: Validate
        let (story, competency, store_category) = validate_request(request)?;

        // Step 2: Prompt
        let prompt = build_star_prompt(&story, &competency, &store_category);

        // Steps 3-4: Provider call with model substitution
        let (raw, model) = self.complete_with_substitution(&prompt).await?;

        // Step 5: Parse
        let parsed = parse_star_response(&raw);
        info!(
            "Generated STAR report: competency={}, category={}, model={}, strategy={:?}",
            competency, store_category, model, parsed.strategy
        );

        let raw_response = parsed.strategy.is_degraded().then_some(raw);
        let fields = parsed.fields;

        Ok(Generated {
            result: GenerationResult {
                situation: fields.situation,
                task: fields.task,
                action: fields.action,
                result: fields.result,
                competency,
                store_category,
                original_story: story,
            },
            strategy: parsed.strategy,
            model,
            raw_response,
        })
    }

    /// Returns the raw completion text and the model that produced it.
    async fn complete_with_substitution(&self, prompt: &str) -> Result<(String, String), AppError> {
        let primary_error = match self
            .provider
            .complete(prompt, &self.primary_model, &self.params)
            .await
        {
            Ok(raw) => return Ok((raw, self.primary_model.clone())),
            Err(e) => e,
        };

        let fallback = match (&self.fallback_model, primary_error.kind()) {
            (Some(fallback), ProviderErrorKind::ModelUnavailable) => fallback,
            _ => return Err(AppError::Llm(primary_error.to_string())),
        };

        warn!(
            "Model {} unavailable ({}), substituting {}",
            self.primary_model, primary_error, fallback
        );

        self.provider
            .complete(prompt, fallback, &self.params)
            .await
            .map(|raw| (raw, fallback.clone()))
            .map_err(|e| {
                AppError::Llm(format!(
                    "fallback model {fallback} also failed: {e} (primary {}: {primary_error})",
                    self.primary_model
                ))
            })
    }
}

/// Checks required inputs, returning trimmed codes. Reports every missing field at once.
fn validate_request(request: GenerateRequest) -> Result<(String, String, String), AppError> {
    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let story = present(request.story);
    let competency = present(request.competency);
    let store_category = present(request.store_category);

    match (story, competency, store_category) {
        (Some(story), Some(competency), Some(store_category)) => Ok((
            story,
            competency.trim().to_string(),
            store_category.trim().to_string(),
        )),
        (story, competency, store_category) => {
            let mut missing = Vec::new();
            if story.is_none() {
                missing.push("story is required");
            }
            if competency.is_none() {
                missing.push("competency is required");
            }
            if store_category.is_none() {
                missing.push("storeCategory is required");
            }
            Err(AppError::invalid_fields(missing.as_slice()))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
