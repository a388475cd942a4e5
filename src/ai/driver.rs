//! Multi-model fallback driver for recipe generation.
//!
//! The driver walks a fixed schedule of (model, attempt) pairs. Each response is
//! judged on its own, and the verdict alone decides whether the run stops.

use tracing::{debug, info, warn};

use super::client::ChatCompletion;
use super::parse::parse_recipes;
use super::policy::GenerationPolicy;
use super::types::{ParsedRecipes, ValidatedRecipe};

/// One scheduled call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedAttempt<'a> {
    /// Model to call
    pub model: &'a str,
    /// Position of the model in the preference list
    pub model_index: usize,
    /// 1-based attempt number for this model
    pub attempt: u32,
}

/// Ordered schedule: every attempt of the first model, then the next model, and so on.
#[derive(Debug, Clone, Copy)]
pub struct FallbackPlan<'a> {
    models: &'a [String],
    max_retries: u32,
}

impl<'a> FallbackPlan<'a> {
    /// Builds the schedule for a policy.
    pub fn new(policy: &'a GenerationPolicy) -> Self {
        Self {
            models: &policy.models,
            max_retries: policy.max_retries,
        }
    }

    /// Total number of scheduled calls.
    pub fn len(&self) -> usize {
        self.models.len() * self.max_retries as usize
    }

    /// True when there's nothing to call.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the schedule in order.
    pub fn steps(self) -> impl Iterator<Item = PlannedAttempt<'a>> + 'a {
        let max_retries = self.max_retries;
        self.models
            .iter()
            .enumerate()
            .flat_map(move |(model_index, model)| {
                (1..=max_retries).map(move |attempt| PlannedAttempt {
                    model: model.as_str(),
                    model_index,
                    attempt,
                })
            })
    }
}

/// What a single response means for the run.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptVerdict {
    /// Enough valid recipes, stop with success.
    Accept(Vec<ValidatedRecipe>),
    /// The model refused the ingredients, stop without retrying anything.
    Reject(String),
    /// Unusable response, try the next scheduled attempt.
    Retry(String),
}

/// Judges a parsed response against the number of recipes requested.
pub fn judge_attempt(parsed: ParsedRecipes, expected: usize) -> AttemptVerdict {
    match parsed {
        ParsedRecipes::Ok { mut data } if data.len() >= expected => {
            data.truncate(expected);
            AttemptVerdict::Accept(data)
        }
        ParsedRecipes::Ok { data } => AttemptVerdict::Retry(format!(
            "only {} of {} recipes were valid",
            data.len(),
            expected
        )),
        ParsedRecipes::AiError { message } => AttemptVerdict::Reject(message),
        ParsedRecipes::InvalidFormat { .. } => {
            AttemptVerdict::Retry("response was not a recipe array".to_string())
        }
    }
}

/// Terminal state of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverOutcome {
    /// A model produced the requested recipes.
    Success {
        /// Model that produced them
        model: String,
        /// Calls made in total, this one included
        attempts: usize,
        /// The recipes
        recipes: Vec<ValidatedRecipe>,
    },
    /// A model refused the ingredients.
    Rejected {
        /// Model that refused
        model: String,
        /// Reason it gave
        message: String,
    },
    /// Every scheduled attempt failed.
    Exhausted {
        /// Calls made in total
        attempts: usize,
    },
}

/// Runs `prompt` through the fallback schedule until a terminal verdict.
pub async fn run_generation(
    chat: &dyn ChatCompletion,
    policy: &GenerationPolicy,
    prompt: &str,
) -> DriverOutcome {
    let plan = FallbackPlan::new(policy);
    let scheduled = plan.len();
    let mut attempts = 0;

    for step in plan.steps() {
        attempts += 1;
        let verdict = match chat.complete(step.model, prompt).await {
            Ok(raw) => {
                let parsed = parse_recipes(&raw);
                if let ParsedRecipes::InvalidFormat { raw } = &parsed {
                    debug!(model = step.model, raw = raw.as_str(), "Unparseable model output");
                }
                judge_attempt(parsed, policy.recipes_per_request)
            }
            Err(err) => AttemptVerdict::Retry(err.to_string()),
        };

        match verdict {
            AttemptVerdict::Accept(recipes) => {
                info!(
                    model = step.model,
                    attempt = step.attempt,
                    "Generated {} recipes",
                    recipes.len()
                );
                return DriverOutcome::Success {
                    model: step.model.to_string(),
                    attempts,
                    recipes,
                };
            }
            AttemptVerdict::Reject(message) => {
                info!(model = step.model, "Model rejected the ingredients: {}", message);
                return DriverOutcome::Rejected {
                    model: step.model.to_string(),
                    message,
                };
            }
            AttemptVerdict::Retry(reason) => {
                warn!(
                    model = step.model,
                    attempt = step.attempt,
                    "Generation attempt failed: {}",
                    reason
                );
                if attempts < scheduled && !policy.retry_delay.is_zero() {
                    tokio::time::sleep(policy.retry_delay).await;
                }
            }
        }
    }

    warn!(attempts = attempts, "All models failed to generate recipes");
    DriverOutcome::Exhausted { attempts }
}
