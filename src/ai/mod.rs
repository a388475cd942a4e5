//! AI-assisted recipe generation.
//!
//! The pipeline, leaves first:
//! - [`sanitize_ingredients`] strips injected instructions and odd characters
//! - [`render_generation_prompt`] builds the strict JSON-array instruction
//! - [`run_generation`] walks the model fallback schedule
//! - [`parse_recipes`] extracts and validates the model's array
//!
//! [`generate_recipes`] ties them together. [`normalize_ingredients`] is the
//! companion driver that translates noisy input before generation.
//!
//! # Example
//!
//! ```ignore
//! use recipeshare::ai::{GenerationPolicy, OpenRouterClient, ParsedRecipes, generate_recipes};
//!
//! let chat = OpenRouterClient::new(&api_key, "https://openrouter.ai/api/v1")?;
//! let policy = GenerationPolicy::default();
//! match generate_recipes(&chat, &policy, &["chicken", "broccoli"], None, None).await? {
//!     ParsedRecipes::Ok { data } => println!("{} recipes", data.len()),
//!     ParsedRecipes::AiError { message } => println!("refused: {message}"),
//!     ParsedRecipes::InvalidFormat { .. } => unreachable!(),
//! }
//! ```

mod client;
mod driver;
mod generate;
mod parse;
mod policy;
pub mod prompts;
mod sanitize;
#[cfg(test)]
pub(crate) mod testing;
mod translate;
mod types;

pub use client::{ChatCompletion, ChatError, OpenRouterClient};
pub use driver::{
    AttemptVerdict, DriverOutcome, FallbackPlan, PlannedAttempt, judge_attempt, run_generation,
};
pub use generate::{GenerationError, generate_recipes};
pub use parse::{extract_json_array, extract_refusal, parse_recipes, validate_recipe};
pub use policy::GenerationPolicy;
pub use prompts::{render_generation_prompt, render_translation_prompt};
pub use sanitize::{is_sanitized, sanitize_ingredient, sanitize_ingredients};
pub use translate::{normalize_ingredients, parse_ingredient_list};
pub use types::{DietType, FinalRecipe, MealType, ParsedRecipes, SignedRecipe, ValidatedRecipe};
