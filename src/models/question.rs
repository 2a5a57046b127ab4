use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ConversationStage;

/// Named priority levels used by the question generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    /// Essential for the decision at hand
    Critical,
    /// Important but can wait
    Important,
    /// Detail confirmation
    FollowUp,
}

/// Question priority: either a named level or a numeric score (1-10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Priority {
    Level(PriorityLevel),
    Score(i64),
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Level(PriorityLevel::Important)
    }
}

fn new_question_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A question proposed by the generation collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateQuestion {
    /// Identifier assigned when the question enters the pipeline
    #[serde(default = "new_question_id")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    /// Free-form category, e.g. "TRACTION" or "metrics"
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, alias = "reasoning", skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CandidateQuestion {
    pub fn new(text: impl Into<String>, category: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: new_question_id(),
            text: text.into(),
            category: category.into(),
            priority,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Questions returned for one generation request
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSet {
    pub questions: Vec<CandidateQuestion>,
    pub stage: ConversationStage,
    /// Number of candidates dropped as already covered
    pub filtered_out: usize,
    /// Whether the generic fallback was used instead of model output
    pub used_fallback: bool,
    pub generated_at: DateTime<Utc>,
}

/// A question shown during a meeting, and whether it was actually asked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingQuestion {
    pub text: String,
    #[serde(default, alias = "is_used")]
    pub is_used: bool,
}

/// Structured post-meeting summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSummary {
    #[serde(default = "default_summary_text")]
    pub summary: String,
    #[serde(default, alias = "key_points")]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default, alias = "action_items")]
    pub action_items: Vec<String>,
    #[serde(default, alias = "key_questions")]
    pub key_questions: Vec<String>,
    #[serde(default, alias = "missed_questions")]
    pub missed_questions: Vec<String>,
    #[serde(default, alias = "next_meeting_agenda")]
    pub next_meeting_agenda: Vec<String>,
    /// Concrete metric values the meeting surfaced, keyed by metric (e.g. `mrr`)
    #[serde(default, alias = "suggested_data_updates")]
    pub suggested_data_updates: BTreeMap<String, serde_json::Value>,
}

/// Summary text used when the model leaves it out
pub const MISSING_SUMMARY_TEXT: &str = "요약을 생성할 수 없습니다.";

fn default_summary_text() -> String {
    MISSING_SUMMARY_TEXT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_accepts_level_or_score() {
        let q: CandidateQuestion =
            serde_json::from_str(r#"{"text": "CAC는?", "category": "metrics", "priority": "follow_up"}"#)
                .unwrap();
        assert_eq!(q.priority, Priority::Level(PriorityLevel::FollowUp));

        let q: CandidateQuestion =
            serde_json::from_str(r#"{"text": "팀은?", "category": "TEAM", "priority": 7}"#).unwrap();
        assert_eq!(q.priority, Priority::Score(7));
    }

    #[test]
    fn test_reasoning_alias_and_generated_id() {
        let q: CandidateQuestion =
            serde_json::from_str(r#"{"text": "시장 규모는?", "reasoning": "TAM 확인"}"#).unwrap();
        assert_eq!(q.reason.as_deref(), Some("TAM 확인"));
        assert!(!q.id.is_empty());
        assert_eq!(q.category, "");
        assert_eq!(q.priority, Priority::default());
    }

    #[test]
    fn test_meeting_question_flag_spellings() {
        let q: MeetingQuestion = serde_json::from_str(r#"{"text": "a", "is_used": true}"#).unwrap();
        assert!(q.is_used);
        let q: MeetingQuestion = serde_json::from_str(r#"{"text": "b", "isUsed": true}"#).unwrap();
        assert!(q.is_used);
        let q: MeetingQuestion = serde_json::from_str(r#"{"text": "c"}"#).unwrap();
        assert!(!q.is_used);
    }

    #[test]
    fn test_summary_accepts_snake_case_keys() {
        let summary: MeetingSummary = serde_json::from_str(
            r#"{"summary": "요약", "key_points": ["a"], "action_items": ["b"]}"#,
        )
        .unwrap();
        assert_eq!(summary.key_points, vec!["a"]);
        assert_eq!(summary.action_items, vec!["b"]);
        assert!(summary.decisions.is_empty());
    }
}
