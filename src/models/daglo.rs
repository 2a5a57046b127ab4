use serde::{Deserialize, Deserializer, Serialize};

use super::TranscriptSegment;

/// Prefix used for numeric speaker IDs when building segment labels
pub const SPEAKER_LABEL_PREFIX: &str = "화자";

/// Response of the synchronous transcription endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DagloSyncResponse {
    #[serde(default)]
    pub stt_result: DagloSttResult,
}

/// Response of the async job submission endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DagloJobSubmitted {
    /// Request ID used to poll the job
    #[serde(default)]
    pub rid: Option<String>,
}

/// Status payload returned while polling an async job
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DagloJobStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub stt_result: Option<DagloSttResult>,
}

impl DagloJobStatus {
    pub fn is_transcribed(&self) -> bool {
        self.status == "transcribed"
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status.as_str(), "failed" | "error")
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DagloSttResult {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub words: Vec<DagloWord>,
}

/// A single recognized word with diarization info
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DagloWord {
    #[serde(default)]
    pub word: String,
    /// Zero-based speaker ID
    #[serde(default)]
    pub speaker_id: u32,
    #[serde(default)]
    pub start_time: DagloTimestamp,
}

/// Protobuf-style duration; `seconds` may arrive as a string or a number
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct DagloTimestamp {
    #[serde(default, deserialize_with = "number_or_string")]
    pub seconds: f64,
    #[serde(default, deserialize_with = "number_or_string")]
    pub nanos: f64,
}

impl DagloTimestamp {
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds + self.nanos / 1e9
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl DagloSttResult {
    /// Group consecutive words of the same speaker into segments
    pub fn segments(&self) -> Vec<TranscriptSegment> {
        let mut segments: Vec<TranscriptSegment> = Vec::new();

        for word in &self.words {
            let label = format!("{}{}", SPEAKER_LABEL_PREFIX, word.speaker_id + 1);

            match segments.last_mut() {
                Some(current) if current.speaker == label => {
                    current.text.push(' ');
                    current.text.push_str(&word.word);
                }
                _ => segments.push(TranscriptSegment::new(
                    label,
                    word.word.clone(),
                    word.start_time.as_secs_f64(),
                )),
            }
        }

        segments
    }
}
