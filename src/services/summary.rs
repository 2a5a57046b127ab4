use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::llm::{build_summary_prompt, parse_summary, CompletionBackend, SUMMARY_SYSTEM_PROMPT};
use crate::models::{MeetingQuestion, MeetingSummary, TranscriptSegment};

/// Vocabulary scanned for key points when the model is unavailable
const FALLBACK_KEYWORDS: &[&str] = &[
    "MRR", "CAC", "LTV", "Churn", "매출", "투자", "성장률", "팀", "기술", "고객",
];

const MAX_LISTED_QUESTIONS: usize = 5;
const MAX_KEY_POINTS: usize = 5;
const MAX_FALLBACK_AGENDA: usize = 3;
const MIN_SENTENCE_CHARS: usize = 10;
const MAX_KEY_POINT_CHARS: usize = 100;

/// Summarize a finished meeting
///
/// Falls back to a keyword-based summary when the model call fails or its
/// output cannot be read.
pub async fn summarize_meeting(
    backend: &dyn CompletionBackend,
    segments: &[TranscriptSegment],
    questions: &[MeetingQuestion],
) -> MeetingSummary {
    let prompt = build_summary_prompt(segments, questions);

    let raw = match backend.complete(SUMMARY_SYSTEM_PROMPT, &prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Summary generation failed: {:#}", e);
            return fallback_summary(segments, questions);
        }
    };

    let Some(mut summary) = parse_summary(&raw) else {
        return fallback_summary(segments, questions);
    };

    let (used, unused) = split_questions(questions);
    if summary.key_questions.is_empty() {
        summary.key_questions = used;
    }
    if summary.missed_questions.is_empty() {
        summary.missed_questions = unused;
    }

    info!(
        "Summary: {} key points, {} action items",
        summary.key_points.len(),
        summary.action_items.len()
    );
    summary
}

/// Keyword summary built without a model
pub fn fallback_summary(segments: &[TranscriptSegment], questions: &[MeetingQuestion]) -> MeetingSummary {
    let text = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let key_points: Vec<String> = FALLBACK_KEYWORDS
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .filter_map(|keyword| {
            text.split('.')
                .map(str::trim)
                .find(|s| s.contains(keyword) && s.chars().count() > MIN_SENTENCE_CHARS)
                .map(|s| s.chars().take(MAX_KEY_POINT_CHARS).collect())
        })
        .collect();

    let (used, unused) = split_questions(questions);

    MeetingSummary {
        summary: format!(
            "회의가 {}개의 발화로 진행되었습니다. {}개의 주요 키워드가 논의되었습니다.",
            segments.len(),
            key_points.len()
        ),
        key_points: key_points.into_iter().take(MAX_KEY_POINTS).collect(),
        decisions: Vec::new(),
        action_items: Vec::new(),
        key_questions: used,
        next_meeting_agenda: unused.iter().take(MAX_FALLBACK_AGENDA).cloned().collect(),
        missed_questions: unused,
        suggested_data_updates: BTreeMap::new(),
    }
}

/// Texts of asked and unasked questions, each capped for display
fn split_questions(questions: &[MeetingQuestion]) -> (Vec<String>, Vec<String>) {
    let pick = |used: bool| -> Vec<String> {
        questions
            .iter()
            .filter(|q| q.is_used == used)
            .take(MAX_LISTED_QUESTIONS)
            .map(|q| q.text.clone())
            .collect()
    };
    (pick(true), pick(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Reply(Option<&'static str>);

    #[async_trait]
    impl CompletionBackend for Reply {
        async fn complete(&self, _system: &str, _user: &str) -> anyhow::Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("timeout"))
        }
    }

    fn segments() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment::new("화자1", "지난달 매출은 얼마였나요?", 0.0),
            TranscriptSegment::new("화자2", "지난달 매출은 5000만원이었고 고객은 120곳입니다. 네", 3.0),
        ]
    }

    fn questions() -> Vec<MeetingQuestion> {
        (0..7)
            .map(|i| MeetingQuestion {
                text: format!("질문 {}", i),
                is_used: i % 2 == 0,
            })
            .collect()
    }

    #[test]
    fn test_fallback_summary() {
        let summary = fallback_summary(&segments(), &questions());

        assert_eq!(
            summary.summary,
            "회의가 2개의 발화로 진행되었습니다. 2개의 주요 키워드가 논의되었습니다."
        );
        assert_eq!(summary.key_points.len(), 2);
        assert!(summary.key_points.iter().all(|p| p.contains("매출")));
        assert_eq!(summary.key_questions, vec!["질문 0", "질문 2", "질문 4", "질문 6"]);
        assert_eq!(summary.missed_questions, vec!["질문 1", "질문 3", "질문 5"]);
        assert_eq!(summary.next_meeting_agenda.len(), 3);
        assert!(summary.decisions.is_empty());
        assert!(summary.suggested_data_updates.is_empty());
    }

    #[test]
    fn test_fallback_summary_empty_meeting() {
        let summary = fallback_summary(&[], &[]);
        assert!(summary.summary.starts_with("회의가 0개의 발화로"));
        assert!(summary.key_points.is_empty());
    }

    #[tokio::test]
    async fn test_model_summary_fills_question_lists() {
        let backend = Reply(Some(
            r#"```json
{"summary": "매출과 고객 수를 확인했습니다.", "key_points": ["월 매출 5000만원"], "action_items": ["재무제표 요청"], "suggested_data_updates": {"mrr": 50000000}}
```"#,
        ));

        let summary = summarize_meeting(&backend, &segments(), &questions()).await;

        assert_eq!(summary.summary, "매출과 고객 수를 확인했습니다.");
        assert_eq!(summary.action_items, vec!["재무제표 요청"]);
        assert_eq!(summary.key_questions.len(), 4);
        assert_eq!(summary.missed_questions.len(), 3);
        assert_eq!(summary.suggested_data_updates["mrr"], serde_json::json!(50000000));
    }

    #[tokio::test]
    async fn test_unreadable_or_failed_model_falls_back() {
        let summary = summarize_meeting(&Reply(Some("요약할 수 없습니다")), &segments(), &[]).await;
        assert!(summary.summary.starts_with("회의가 2개의 발화로"));

        let summary = summarize_meeting(&Reply(None), &segments(), &[]).await;
        assert!(summary.summary.starts_with("회의가 2개의 발화로"));
    }
}
