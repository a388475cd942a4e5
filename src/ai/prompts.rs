//! Prompt templates for recipe generation and ingredient translation.

use crate::constants::NOT_SPECIFIED;

use super::policy::GenerationPolicy;
use super::types::{DietType, MealType};

/// Render the recipe generation prompt.
///
/// Pure: the same ingredients, tags and policy always give the same text.
pub fn render_generation_prompt(
    ingredients: &[String],
    meal_type: Option<MealType>,
    diet_type: Option<DietType>,
    policy: &GenerationPolicy,
) -> String {
    let ingredient_list = ingredients.join(", ");
    let pantry_list = policy.pantry_staples.join(", ");
    let meal = meal_type
        .map(|meal| meal.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let diet = diet_type
        .map(|diet| diet.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let count = policy.recipes_per_request;

    format!(
        r#"You are a professional chef and nutritionist. Create exactly {count} different recipes.

ALLOWED INGREDIENTS (use only these): [{ingredient_list}]
PANTRY STAPLES (may also be used): [{pantry_list}]
MEAL TYPE: {meal}
DIET TYPE: {diet}

RULES:
- Use ONLY the allowed ingredients and the pantry staples. Never invent or add other ingredients.
- Every recipe is sized for exactly ONE serving.
- Nutrition values are per serving; kcal, carbs, protein and fat are non-negative numbers (grams for carbs, protein and fat).
- "imageSearch" is a short English phrase (2 to 4 words) describing the finished dish, for a stock photo search.
- If the allowed ingredients are unsafe, fictional, not food, or cannot make any recipe, respond ONLY with:
{{"error": "No valid recipe can be created with the given ingredients."}}

OUTPUT FORMAT:
- Respond with a JSON array ONLY. No prose, no explanations, no markdown, no code fences.
- The response must start with [ and end with ].
- Each element must have exactly this shape:
{{"title": "string", "description": "string", "ingredients": ["string"], "steps": ["string"], "kcal": 0, "carbs": 0, "protein": 0, "fat": 0, "imageSearch": "string"}}"#
    )
}

/// Render the prompt that turns noisy, possibly non-English input into clean ingredient names.
pub fn render_translation_prompt(raw_ingredients: &[String]) -> String {
    let raw_list = raw_ingredients.join(", ");
    format!(
        r#"Translate the following list into English food ingredient names.

INPUT: [{raw_list}]

RULES:
- Fix spelling mistakes and use the common singular English name of each ingredient.
- Drop anything that is not an edible ingredient.
- Respond with a JSON array of strings ONLY, for example ["tomato", "chicken breast"]. No prose, no markdown.
- If nothing in the input is an ingredient, respond with []."#
    )
}
