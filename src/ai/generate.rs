//! Entry point of the recipe generation pipeline.

use thiserror::Error;

use super::client::ChatCompletion;
use super::driver::{DriverOutcome, run_generation};
use super::policy::GenerationPolicy;
use super::prompts::render_generation_prompt;
use super::sanitize::sanitize_ingredients;
use super::types::{DietType, MealType, ParsedRecipes};

/// Failures surfaced to callers of [`generate_recipes`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Sanitizing left nothing to cook with.
    #[error("no valid ingredients provided")]
    NoValidIngredients,

    /// Every model and attempt failed.
    #[error("all models failed to generate recipes")]
    AllModelsFailed,
}

/// Sanitizes the ingredients, builds the prompt and runs the fallback driver.
///
/// Returns `ParsedRecipes::Ok` with exactly `recipes_per_request` recipes, or
/// `ParsedRecipes::AiError` when a model refused the ingredients.
pub async fn generate_recipes<S: AsRef<str>>(
    chat: &dyn ChatCompletion,
    policy: &GenerationPolicy,
    raw_ingredients: &[S],
    meal_type: Option<MealType>,
    diet_type: Option<DietType>,
) -> Result<ParsedRecipes, GenerationError> {
    let ingredients = sanitize_ingredients(raw_ingredients);
    if ingredients.is_empty() {
        return Err(GenerationError::NoValidIngredients);
    }

    let prompt = render_generation_prompt(&ingredients, meal_type, diet_type, policy);
    match run_generation(chat, policy, &prompt).await {
        DriverOutcome::Success { recipes, .. } => Ok(ParsedRecipes::Ok { data: recipes }),
        DriverOutcome::Rejected { message, .. } => Ok(ParsedRecipes::AiError { message }),
        DriverOutcome::Exhausted { .. } => Err(GenerationError::AllModelsFailed),
    }
}
