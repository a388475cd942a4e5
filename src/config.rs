//! Config handling

use std::time::Duration;

use tracing::log::LevelFilter;

use crate::ai::GenerationPolicy;
use crate::cli::CliOptions;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("sqlx", LevelFilter::Warn)
            .with_module_level("sea_orm", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Builds the generation policy from CLI/env options, keeping defaults for anything unset.
pub fn generation_policy(cli: &CliOptions) -> GenerationPolicy {
    let mut policy = GenerationPolicy::default()
        .with_max_retries(cli.ai_max_retries)
        .with_retry_delay(Duration::from_millis(cli.ai_retry_delay_ms))
        .with_recipes_per_request(cli.recipes_per_request);

    let models: Vec<&String> = cli
        .ai_models
        .iter()
        .filter(|model| !model.trim().is_empty())
        .collect();
    if !models.is_empty() {
        policy = policy.with_models(models.into_iter().map(|model| model.trim().to_string()));
    }
    policy
}
