use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use super::{AudioInput, ProviderOutcome, SttProvider};
use crate::models::{ProviderTag, SttResult, WhisperResponse};

/// Configuration for the OpenAI transcription endpoint
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// API key (from OPENAI_API_KEY)
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// ISO-639-1 hint passed to the model
    pub language: String,
    /// Limit for the whole upload, from connect to the end of the body
    pub request_timeout: Duration,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "whisper-1".to_string(),
            language: "ko".to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Secondary STT provider, no speaker separation
pub struct WhisperProvider {
    client: Client,
    config: WhisperConfig,
}

impl WhisperProvider {
    pub fn new(config: WhisperConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn request(&self, audio: &AudioInput) -> anyhow::Result<WhisperResponse> {
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let file = Part::bytes(audio.bytes.clone())
            .file_name(audio.filename.clone())
            .mime_str(audio.mime_type())?;
        let form = Form::new()
            .part("file", file)
            .text("model", self.config.model.clone())
            .text("language", self.config.language.clone())
            .text("response_format", "verbose_json");

        let response = self
            .client
            .post(format!(
                "{}/audio/transcriptions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .timeout(self.config.request_timeout)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Whisper API error: {} - {}", status, body);
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SttProvider for WhisperProvider {
    fn tag(&self) -> ProviderTag {
        ProviderTag::Whisper
    }

    fn is_configured(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Any failure here is final; there is nothing further down the chain
    async fn transcribe(&self, audio: &AudioInput) -> ProviderOutcome {
        if audio.is_empty() {
            return ProviderOutcome::Fatal("audio input is empty".into());
        }
        let started = Instant::now();

        match self.request(audio).await {
            Ok(response) => {
                debug!(
                    "Whisper transcribed {} chars (language {:?})",
                    response.text.len(),
                    response.language
                );
                ProviderOutcome::Success(SttResult::flat(
                    response.text,
                    response.duration.unwrap_or(0.0),
                    started.elapsed().as_secs_f64(),
                    ProviderTag::Whisper,
                ))
            }
            Err(e) => ProviderOutcome::Fatal(e.to_string()),
        }
    }
}
