use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::heuristics::HeuristicsConfig;
use crate::llm::AnthropicConfig;
use crate::stt::{DagloConfig, PollConfig, TranscoderConfig, WhisperConfig};

/// Process-wide settings, read once at startup and never mutated
///
/// Missing credentials are not an error: they decide which providers the
/// chain tries.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub daglo: DagloConfig,
    pub whisper: WhisperConfig,
    pub transcoder: TranscoderConfig,
    /// Present only when ANTHROPIC_API_KEY is set
    pub anthropic: Option<AnthropicConfig>,
    pub heuristics: HeuristicsConfig,
}

impl AppConfig {
    /// Load `.env` (if any) and read settings from the environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();

        config.daglo.api_token = get("DAGLO_API_TOKEN");
        if let Some(url) = get("DAGLO_BASE_URL") {
            config.daglo.base_url = url;
        }

        let mut poll = PollConfig::default();
        if let Some(secs) = get("STT_POLL_INTERVAL_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("STT_POLL_INTERVAL_SECS is not a number: {}", secs))?;
            poll.interval = Duration::from_secs(secs);
        }
        if let Some(attempts) = get("STT_MAX_POLL_ATTEMPTS") {
            poll.max_attempts = attempts
                .trim()
                .parse()
                .with_context(|| format!("STT_MAX_POLL_ATTEMPTS is not a number: {}", attempts))?;
        }
        if poll.max_attempts == 0 {
            anyhow::bail!("STT_MAX_POLL_ATTEMPTS must be at least 1");
        }
        config.daglo.poll = poll;

        if let Some(secs) = get("STT_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("STT_REQUEST_TIMEOUT_SECS is not a number: {}", secs))?;
            if secs == 0 {
                anyhow::bail!("STT_REQUEST_TIMEOUT_SECS must be at least 1");
            }
            config.daglo.request_timeout = Duration::from_secs(secs);
            config.whisper.request_timeout = Duration::from_secs(secs);
        }

        config.whisper.api_key = get("OPENAI_API_KEY");
        if let Some(url) = get("OPENAI_BASE_URL") {
            config.whisper.base_url = url;
        }

        if let Some(program) = get("FFMPEG_PATH") {
            config.transcoder.program = PathBuf::from(program);
        }

        config.anthropic = get("ANTHROPIC_API_KEY").map(|key| {
            let mut anthropic = AnthropicConfig::new(key, "claude-sonnet-4-20250514".to_string());
            if let Some(model) = get("ANTHROPIC_MODEL") {
                anthropic.model = model;
            }
            anthropic
        });

        Ok(config)
    }
}
