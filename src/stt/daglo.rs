use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, warn};

use super::{AudioInput, AudioTranscoder, PcmFormat, ProviderOutcome, SttProvider};
use crate::error::{Error, Result};
use crate::io::format_transcript;
use crate::models::{
    DagloJobStatus, DagloJobSubmitted, DagloSttResult, DagloSyncResponse, ProviderTag, SttResult,
};

/// Bounded polling policy for async jobs
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
    /// Limit for the submit request and for each status request
    pub request_timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
            request_timeout: Duration::from_secs(300),
        }
    }
}

/// Configuration for the Daglo STT API
#[derive(Debug, Clone)]
pub struct DagloConfig {
    /// Bearer token (from DAGLO_API_TOKEN); the provider is skipped without it
    pub api_token: Option<String>,
    /// API root, e.g. "https://apis.daglo.ai/stt/v1"
    pub base_url: String,
    pub poll: PollConfig,
    /// Limit for a sync upload, from connect to the end of the body
    pub request_timeout: Duration,
    /// Encoding the sync endpoint expects
    pub format: PcmFormat,
}

impl Default for DagloConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: "https://apis.daglo.ai/stt/v1".to_string(),
            poll: PollConfig::default(),
            request_timeout: Duration::from_secs(60),
            format: PcmFormat::default(),
        }
    }
}

impl DagloConfig {
    fn sync_url(&self) -> String {
        format!("{}/sync/transcripts", self.base_url.trim_end_matches('/'))
    }

    fn async_url(&self) -> String {
        format!("{}/async/transcripts", self.base_url.trim_end_matches('/'))
    }
}

/// Primary STT provider
pub struct DagloProvider {
    client: Client,
    config: DagloConfig,
    transcoder: Arc<dyn AudioTranscoder>,
}

impl DagloProvider {
    pub fn new(config: DagloConfig, transcoder: Arc<dyn AudioTranscoder>) -> Self {
        Self {
            client: Client::new(),
            config,
            transcoder,
        }
    }

    /// Bearer token, if one is set and not blank
    fn token(&self) -> Option<&str> {
        self.config
            .api_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }

    /// Bytes in the provider's required encoding, transcoding only when needed
    async fn prepare_audio(&self, audio: &AudioInput) -> Result<Vec<u8>> {
        if self.config.format.matches(&audio.bytes) {
            debug!("Audio already in target PCM format, skipping transcode");
            return Ok(audio.bytes.clone());
        }
        self.transcoder.to_pcm_wav(audio, self.config.format).await
    }

    async fn upload(&self, token: &str, pcm: Vec<u8>) -> Result<reqwest::Response> {
        let part = Part::bytes(pcm)
            .file_name("audio.wav")
            .mime_str("audio/wav")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.config.sync_url())
            .bearer_auth(token)
            .timeout(self.config.request_timeout)
            .multipart(form)
            .send()
            .await?;
        Ok(response)
    }

    /// Transcribe a publicly reachable recording as a polled async job
    ///
    /// Speaker diarization is enabled, so the result carries speaker segments.
    /// A job that neither completes nor fails within the configured attempts
    /// is reported as [`Error::TranscriptionUnavailable`].
    pub async fn transcribe_url(&self, audio_url: &str) -> Result<SttResult> {
        let token = self.token().ok_or_else(|| {
            Error::Configuration("DAGLO_API_TOKEN is required for async transcription".into())
        })?;
        let started = Instant::now();

        let payload = serde_json::json!({
            "audio": {"source": {"url": audio_url}},
            "sttConfig": {"speakerDiarization": {"enable": true}},
        });

        let poll = self.config.poll;

        let response = self
            .client
            .post(self.config.async_url())
            .bearer_auth(token)
            .timeout(poll.request_timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                Error::TranscriptionUnavailable(format!("Daglo job submission failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TranscriptionUnavailable(format!(
                "Daglo job submission failed: {} - {}",
                status, body
            )));
        }

        let submitted: DagloJobSubmitted = response.json().await.map_err(|e| {
            Error::TranscriptionUnavailable(format!("unreadable Daglo job submission: {}", e))
        })?;
        let rid = submitted.rid.filter(|r| !r.is_empty()).ok_or_else(|| {
            Error::TranscriptionUnavailable("no request id returned by Daglo".into())
        })?;
        info!("Submitted Daglo job {}", rid);

        let status_url = format!("{}/{}", self.config.async_url(), rid);

        for attempt in 1..=poll.max_attempts {
            tokio::time::sleep(poll.interval).await;

            let request = self
                .client
                .get(&status_url)
                .bearer_auth(token)
                .timeout(poll.request_timeout);

            let response = match request.send().await {
                Ok(r) if r.status().is_success() => r,
                Ok(r) => {
                    debug!("Poll {} for {} returned {}", attempt, rid, r.status());
                    continue;
                }
                Err(e) => {
                    warn!("Poll {} for {} failed: {}", attempt, rid, e);
                    continue;
                }
            };

            let status: DagloJobStatus = match response.json().await {
                Ok(s) => s,
                Err(e) => {
                    warn!("Unreadable status for {}: {}", rid, e);
                    continue;
                }
            };

            if status.is_transcribed() {
                let result = status.stt_result.unwrap_or_default();
                info!("Daglo job {} transcribed after {} polls", rid, attempt);
                return Ok(build_result(
                    result,
                    started.elapsed().as_secs_f64(),
                    ProviderTag::DagloAsync,
                ));
            }

            if status.is_failed() {
                return Err(Error::TranscriptionUnavailable(format!(
                    "Daglo job {} ended with status {}",
                    rid, status.status
                )));
            }

            debug!("Daglo job {} status {:?}", rid, status.status);
        }

        Err(Error::TranscriptionUnavailable(format!(
            "Daglo job {} did not finish after {} polls",
            rid, poll.max_attempts
        )))
    }
}

fn build_result(result: DagloSttResult, latency: f64, provider: ProviderTag) -> SttResult {
    let segments = result.segments();
    let formatted_text = if segments.is_empty() {
        result.transcript.clone()
    } else {
        format_transcript(&segments)
    };

    SttResult {
        text: result.transcript,
        formatted_text,
        segments,
        duration_seconds: 0.0,
        latency_seconds: latency,
        provider,
    }
}

#[async_trait]
impl SttProvider for DagloProvider {
    fn tag(&self) -> ProviderTag {
        ProviderTag::Daglo
    }

    fn is_configured(&self) -> bool {
        self.token().is_some()
    }

    async fn transcribe(&self, audio: &AudioInput) -> ProviderOutcome {
        let Some(token) = self.token() else {
            return ProviderOutcome::Retryable("DAGLO_API_TOKEN not set".into());
        };
        let started = Instant::now();

        let pcm = match self.prepare_audio(audio).await {
            Ok(pcm) => pcm,
            Err(e) => return ProviderOutcome::Retryable(e.to_string()),
        };

        let response = match self.upload(token, pcm).await {
            Ok(r) => r,
            Err(e) => return ProviderOutcome::Retryable(e.to_string()),
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return ProviderOutcome::Retryable(format!("Daglo API error: {} - {}", status, body));
        }

        let parsed: DagloSyncResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => return ProviderOutcome::Retryable(format!("unreadable Daglo response: {}", e)),
        };

        let result = build_result(
            parsed.stt_result,
            started.elapsed().as_secs_f64(),
            ProviderTag::Daglo,
        );

        if result.is_blank() {
            return ProviderOutcome::Retryable("Daglo returned an empty transcript".into());
        }

        ProviderOutcome::Success(result)
    }
}
