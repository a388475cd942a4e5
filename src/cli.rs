//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;

use crate::constants::{
    DEFAULT_MAX_RETRIES, DEFAULT_OPENROUTER_BASE_URL, DEFAULT_PEXELS_BASE_URL,
    DEFAULT_RECIPES_PER_REQUEST, PLACEHOLDER_IMAGE_URL,
};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "RECIPESHARE_DEBUG")]
    /// Enable debug logging. Env: RECIPESHARE_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "9000", env = "RECIPESHARE_PORT")]
    /// http listener, defaults to `9000`.
    /// Env: RECIPESHARE_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "RECIPESHARE_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: RECIPESHARE_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(
        long,
        short,
        default_value = "recipeshare.sqlite",
        env = "RECIPESHARE_DATABASE_PATH"
    )]
    /// Path to the database file, eg `/data/recipeshare.sqlite`.
    /// Env: RECIPESHARE_DATABASE_PATH
    pub database_path: String,

    #[clap(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    /// API key for the chat-completion service. Env: OPENROUTER_API_KEY
    pub openrouter_api_key: String,
    #[clap(long, default_value = DEFAULT_OPENROUTER_BASE_URL, env = "RECIPESHARE_AI_BASE_URL")]
    /// Chat-completion API base. Env: RECIPESHARE_AI_BASE_URL
    pub ai_base_url: String,
    #[clap(long, value_delimiter = ',', env = "RECIPESHARE_AI_MODELS")]
    /// Comma-separated models in order of preference, defaults to the built-in list.
    /// Env: RECIPESHARE_AI_MODELS
    pub ai_models: Vec<String>,
    #[clap(long, default_value_t = DEFAULT_MAX_RETRIES, env = "RECIPESHARE_AI_MAX_RETRIES")]
    /// Attempts per model. Env: RECIPESHARE_AI_MAX_RETRIES
    pub ai_max_retries: u32,
    #[clap(long, default_value = "1500", env = "RECIPESHARE_AI_RETRY_DELAY_MS")]
    /// Delay between failed attempts in ms. Env: RECIPESHARE_AI_RETRY_DELAY_MS
    pub ai_retry_delay_ms: u64,
    #[clap(long, default_value_t = DEFAULT_RECIPES_PER_REQUEST, env = "RECIPESHARE_RECIPES_PER_REQUEST")]
    /// Recipes per generation. Env: RECIPESHARE_RECIPES_PER_REQUEST
    pub recipes_per_request: usize,
    #[clap(long, env = "RECIPESHARE_TRANSLATE_INGREDIENTS")]
    /// Translate and clean ingredients with the model before generating.
    /// Env: RECIPESHARE_TRANSLATE_INGREDIENTS
    pub translate_ingredients: bool,

    #[clap(long, env = "PEXELS_API_KEY", hide_env_values = true)]
    /// API key for the photo search. Env: PEXELS_API_KEY
    pub pexels_api_key: String,
    #[clap(long, default_value = DEFAULT_PEXELS_BASE_URL, env = "RECIPESHARE_PEXELS_BASE_URL")]
    /// Photo search API base. Env: RECIPESHARE_PEXELS_BASE_URL
    pub pexels_base_url: String,
    #[clap(long, default_value = PLACEHOLDER_IMAGE_URL, env = "RECIPESHARE_PLACEHOLDER_IMAGE_URL")]
    /// Image used when no photo is found. Env: RECIPESHARE_PLACEHOLDER_IMAGE_URL
    pub placeholder_image_url: String,

    #[clap(long, env = "RECIPESHARE_SIGNING_SECRET", hide_env_values = true)]
    /// Secret for recipe fingerprints. Env: RECIPESHARE_SIGNING_SECRET
    pub signing_secret: String,

    #[clap(long, env = "RECIPESHARE_AUTH_URL")]
    /// Base URL of the hosted identity service. Env: RECIPESHARE_AUTH_URL
    pub auth_url: String,
    #[clap(long, env = "RECIPESHARE_AUTH_ANON_KEY", hide_env_values = true)]
    /// Public key sent to the identity service. Env: RECIPESHARE_AUTH_ANON_KEY
    pub auth_anon_key: String,
}
