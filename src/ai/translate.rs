//! Turns noisy, possibly non-English ingredient input into clean English names.

use tracing::{debug, warn};

use super::client::ChatCompletion;
use super::parse::extract_json_array;
use super::policy::GenerationPolicy;
use super::prompts::render_translation_prompt;
use super::sanitize::sanitize_ingredients;

/// Tries each model once and returns the first usable ingredient list.
///
/// An empty result means every model failed; treat it as "no valid ingredients".
pub async fn normalize_ingredients(
    chat: &dyn ChatCompletion,
    policy: &GenerationPolicy,
    raw_ingredients: &[String],
) -> Vec<String> {
    let cleaned_input = sanitize_ingredients(raw_ingredients);
    if cleaned_input.is_empty() {
        return Vec::new();
    }
    let prompt = render_translation_prompt(&cleaned_input);

    for model in &policy.models {
        let raw = match chat.complete(model, &prompt).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(model = model.as_str(), "Ingredient translation failed: {}", err);
                continue;
            }
        };

        let translated = parse_ingredient_list(&raw);
        if translated.is_empty() {
            debug!(model = model.as_str(), raw = raw.as_str(), "Unusable translation");
            continue;
        }
        return translated;
    }

    warn!("No model could translate the ingredient list");
    Vec::new()
}

/// Reads a JSON array of strings out of model text and sanitizes each entry.
pub fn parse_ingredient_list(raw: &str) -> Vec<String> {
    let Some(candidate) = extract_json_array(raw) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(candidate) {
        Ok(items) => sanitize_ingredients(&items),
        Err(_) => Vec::new(),
    }
}
