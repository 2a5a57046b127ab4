use serde::{Deserialize, Serialize};

/// `verbose_json` response of the OpenAI transcription endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhisperResponse {
    #[serde(default)]
    pub text: String,
    /// Audio duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub language: Option<String>,
}
