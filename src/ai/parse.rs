//! Reads model output into validated recipes.
//!
//! Extraction is loose (models wrap JSON in prose no matter what the prompt
//! says), validation is strict (a recipe's field shape must never drift).

use serde::Deserialize;
use serde_json::Value;

use super::types::{ParsedRecipes, ValidatedRecipe};

#[derive(Debug, Deserialize)]
struct RefusalBody {
    error: String,
}

/// Returns the model's refusal message when the text is an `{"error": ...}` object.
pub fn extract_refusal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('{') || !trimmed.contains("\"error\"") {
        return None;
    }
    // Only the leading object counts; models sometimes trail it with prose.
    serde_json::Deserializer::from_str(trimmed)
        .into_iter::<RefusalBody>()
        .next()?
        .ok()
        .map(|body| body.error)
}

/// Greedy substring from the first `[` to the last `]`.
pub fn extract_json_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Validates one array element against the recipe shape.
pub fn validate_recipe(value: &Value) -> Option<ValidatedRecipe> {
    let recipe = ValidatedRecipe::deserialize(value).ok()?;
    recipe.is_valid().then_some(recipe)
}

/// Parses raw model output into the result envelope.
pub fn parse_recipes(raw: &str) -> ParsedRecipes {
    if let Some(message) = extract_refusal(raw) {
        return ParsedRecipes::AiError { message };
    }

    let invalid = || ParsedRecipes::InvalidFormat {
        raw: raw.to_string(),
    };

    let Some(candidate) = extract_json_array(raw) else {
        return invalid();
    };
    let Ok(Value::Array(elements)) = serde_json::from_str::<Value>(candidate) else {
        return invalid();
    };

    let data: Vec<ValidatedRecipe> = elements.iter().filter_map(validate_recipe).collect();
    if data.is_empty() {
        return invalid();
    }
    ParsedRecipes::Ok { data }
}
