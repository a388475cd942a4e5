//! Shared constants/defaults for things
//!

use std::time::Duration;

/// Models tried in order when generating recipes, earlier is preferred.
pub const DEFAULT_MODELS: &[&str] = &[
    "google/gemini-2.0-flash-001",
    "meta-llama/llama-3.3-70b-instruct",
    "mistralai/mistral-small-3.1-24b-instruct",
];

/// Default OpenRouter (OpenAI-compatible) API base.
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default Pexels API base.
pub const DEFAULT_PEXELS_BASE_URL: &str = "https://api.pexels.com/v1";

/// Attempts per model before moving on to the next one.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Fixed delay between failed attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1500);

/// How many recipes each generation asks for.
pub const DEFAULT_RECIPES_PER_REQUEST: usize = 4;

/// Staples the model may use on top of the user's ingredients.
pub const DEFAULT_PANTRY_STAPLES: &[&str] = &[
    "salt",
    "black pepper",
    "water",
    "olive oil",
    "vegetable oil",
    "butter",
    "sugar",
    "flour",
    "garlic",
    "onion",
    "vinegar",
    "dried herbs",
];

/// Image used whenever the photo search comes back empty or fails.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.pexels.com/photos/1640777/pexels-photo-1640777.jpeg";

/// Rendered in prompts when the user didn't pick a meal or diet type.
pub const NOT_SPECIFIED: &str = "NOT SPECIFIED";

/// Max number of recipes returned by listing endpoints.
pub const RECIPE_LIST_LIMIT: u64 = 50;

/// Timeout applied to outbound API calls.
pub const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(60);

#[cfg(test)]
/// Secret used when signing in tests
pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";
