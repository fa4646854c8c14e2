//! Pipeline configuration

use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Explicit configuration object passed into the pipeline constructor.
/// Every knob has a default and can be overridden by the caller or, via
/// [`AnalysisConfig::from_env`], the environment.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Credential for the generative-AI endpoint. Absent means every
    /// analysis invocation fails with a configuration error.
    pub api_key: Option<String>,
    pub model: String,
    /// Upper bound on how many posts are selected for analysis.
    pub max_posts: usize,
    /// Message character budget; text past it is invisible to the pipeline.
    pub truncate_chars: usize,
    /// Posts per AI request in the per-post pass.
    pub batch_size: usize,
    pub max_retries: u32,
    /// Attempt `n` waits `n * backoff_unit` before the next try.
    pub backoff_unit: Duration,
    /// Pause between the per-post and aggregate passes.
    pub pass_delay: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_posts: 15,
            truncate_chars: 500,
            batch_size: 5,
            max_retries: 3,
            backoff_unit: Duration::from_secs(2),
            pass_delay: Duration::from_secs(2),
        }
    }
}

impl AnalysisConfig {
    /// Read the credential and performance knobs from the environment,
    /// falling back to the defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok().filter(|key| !key.is_empty()),
            max_posts: env_usize("PULSE_AI_MAX_POSTS", defaults.max_posts),
            truncate_chars: env_usize("PULSE_AI_TRUNCATE_CHARS", defaults.truncate_chars),
            batch_size: env_usize("PULSE_AI_BATCH_SIZE", defaults.batch_size),
            ..defaults
        }
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
