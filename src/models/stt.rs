use serde::{Deserialize, Serialize};

use super::TranscriptSegment;

/// Which provider produced a transcription result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTag {
    /// Primary provider, synchronous upload
    Daglo,
    /// Primary provider, submitted as a polled job
    DagloAsync,
    /// Secondary provider
    Whisper,
    /// No provider succeeded; the result is a degraded placeholder
    Error,
}

impl ProviderTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTag::Daglo => "daglo",
            ProviderTag::DagloAsync => "daglo_async",
            ProviderTag::Whisper => "whisper",
            ProviderTag::Error => "error",
        }
    }
}

impl std::fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized output of any transcription path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SttResult {
    /// Raw transcript text
    pub text: String,
    /// Transcript with speaker headers and timestamps (equal to `text` when undiarized)
    pub formatted_text: String,
    /// Speaker segments; empty when the provider has no speaker separation
    pub segments: Vec<TranscriptSegment>,
    /// Audio duration reported by the provider (0 when unknown)
    #[serde(rename = "duration")]
    pub duration_seconds: f64,
    /// Wall-clock time spent on the call
    #[serde(rename = "latency")]
    pub latency_seconds: f64,
    pub provider: ProviderTag,
}

impl SttResult {
    /// Result for a provider that returns flat text only
    pub fn flat(text: String, duration_seconds: f64, latency_seconds: f64, provider: ProviderTag) -> Self {
        Self {
            formatted_text: text.clone(),
            text,
            segments: Vec::new(),
            duration_seconds,
            latency_seconds,
            provider,
        }
    }

    /// Empty-but-valid result a caller may substitute when transcription is unavailable
    pub fn unavailable() -> Self {
        Self::flat(String::new(), 0.0, 0.0, ProviderTag::Error)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
