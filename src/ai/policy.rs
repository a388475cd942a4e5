//! Tunables for the generation pipeline.

use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_RETRIES, DEFAULT_MODELS, DEFAULT_PANTRY_STAPLES, DEFAULT_RECIPES_PER_REQUEST,
    DEFAULT_RETRY_DELAY,
};

/// Model list, retry budget and prompt knobs injected into the drivers.
#[derive(Debug, Clone)]
pub struct GenerationPolicy {
    /// Model identifiers in order of preference.
    pub models: Vec<String>,
    /// Attempts per model.
    pub max_retries: u32,
    /// Fixed sleep between failed attempts.
    pub retry_delay: Duration,
    /// Number of recipes requested, and required for success.
    pub recipes_per_request: usize,
    /// Staples the model may add beyond the user's ingredients.
    pub pantry_staples: Vec<String>,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|model| model.to_string()).collect(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            recipes_per_request: DEFAULT_RECIPES_PER_REQUEST,
            pantry_staples: DEFAULT_PANTRY_STAPLES
                .iter()
                .map(|item| item.to_string())
                .collect(),
        }
    }
}

impl GenerationPolicy {
    /// Replaces the model list.
    pub fn with_models<S: Into<String>>(mut self, models: impl IntoIterator<Item = S>) -> Self {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Sets attempts per model, at least one.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Sets the delay between failed attempts.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Sets how many recipes a generation asks for, at least one.
    pub fn with_recipes_per_request(mut self, count: usize) -> Self {
        self.recipes_per_request = count.max(1);
        self
    }
}
