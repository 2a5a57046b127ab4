use serde::{Deserialize, Serialize};

/// Conversational role inferred for a speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerRole {
    /// Asks questions, probes metrics (e.g. an investor)
    Interviewer,
    /// Answers and explains (e.g. a founder)
    Subject,
    /// Not enough evidence either way
    #[default]
    Unknown,
}

impl SpeakerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerRole::Interviewer => "interviewer",
            SpeakerRole::Subject => "subject",
            SpeakerRole::Unknown => "unknown",
        }
    }
}

/// A contiguous run of speech attributed to one speaker label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Speaker label as produced by the STT provider (e.g. "화자1")
    pub speaker: String,
    /// Spoken text
    #[serde(default)]
    pub text: String,
    /// Offset of the first word, in seconds
    #[serde(rename = "startTime", default)]
    pub start_time_seconds: f64,
    /// Role assigned by the speaker-role heuristic
    #[serde(
        rename = "speakerRole",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<SpeakerRole>,
}

impl TranscriptSegment {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>, start_time_seconds: f64) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            start_time_seconds,
            role: None,
        }
    }

    /// Role, treating an unassigned role as unknown
    pub fn role_or_unknown(&self) -> SpeakerRole {
        self.role.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_wire_names() {
        let json = r#"{"speaker": "화자1", "text": "안녕하세요", "startTime": 2.5}"#;
        let segment: TranscriptSegment = serde_json::from_str(json).unwrap();

        assert_eq!(segment.speaker, "화자1");
        assert_eq!(segment.start_time_seconds, 2.5);
        assert_eq!(segment.role, None);

        let mut tagged = segment.clone();
        tagged.role = Some(SpeakerRole::Interviewer);
        let out = serde_json::to_value(&tagged).unwrap();
        assert_eq!(out["speakerRole"], "interviewer");
        assert_eq!(out["startTime"], 2.5);
    }

    #[test]
    fn test_missing_text_defaults_to_empty() {
        let segment: TranscriptSegment = serde_json::from_str(r#"{"speaker": "A"}"#).unwrap();
        assert_eq!(segment.text, "");
        assert_eq!(segment.role_or_unknown(), SpeakerRole::Unknown);
    }
}
