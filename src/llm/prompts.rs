use crate::models::{MeetingQuestion, TranscriptSegment};

/// Character limits applied to transcripts before they go into a prompt
pub const QUESTION_TRANSCRIPT_LIMIT: usize = 4000;
pub const SUMMARY_TRANSCRIPT_LIMIT: usize = 8000;

/// Questions listed per group in the summary prompt
const SUMMARY_QUESTION_LIMIT: usize = 10;

/// System prompt for question generation
pub const QUESTION_SYSTEM_PROMPT: &str =
    "You are an expert venture capital analyst. Always respond in valid JSON.";

/// System prompt for meeting summaries
pub const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a meeting summarization expert. Always respond in valid JSON.";

/// Build the user prompt for question generation
pub fn build_question_prompt(transcript: &str, context_block: &str, answered_facts: &[String]) -> String {
    let mut prompt = String::new();

    prompt.push_str("## 대화 전사\n");
    prompt.push_str(truncate_chars(transcript, QUESTION_TRANSCRIPT_LIMIT));
    prompt.push_str("\n\n");

    prompt.push_str("## 대화 맥락\n");
    prompt.push_str(context_block);
    prompt.push_str("\n\n");

    if !answered_facts.is_empty() {
        prompt.push_str("## 이미 답변된 내용\n");
        for fact in answered_facts {
            prompt.push_str(&format!("- {}\n", fact));
        }
        prompt.push('\n');
    }

    prompt.push_str("## 지침\n");
    prompt.push_str("- 이미 언급된 지표나 주제는 다시 묻지 마세요\n");
    prompt.push_str("- 대화 단계에 맞는 질문 3-5개를 제안하세요\n");
    prompt.push_str("- category: BUSINESS_MODEL|TRACTION|TEAM|MARKET|TECHNOLOGY|FINANCIALS|RISKS\n");
    prompt.push_str("- priority: critical|important|follow_up 또는 1-10\n\n");

    prompt.push_str("## 출력 형식 (JSON)\n");
    prompt.push_str(
        r#"{"questions": [{"text": "...", "category": "...", "priority": "...", "reason": "..."}]}"#,
    );
    prompt.push('\n');

    prompt
}

/// Build the user prompt for a meeting summary
pub fn build_summary_prompt(segments: &[TranscriptSegment], questions: &[MeetingQuestion]) -> String {
    let transcript = segments
        .iter()
        .map(|s| format!("[{}]: {}", s.speaker, s.text))
        .collect::<Vec<_>>()
        .join("\n");

    let (used, unused): (Vec<&MeetingQuestion>, Vec<&MeetingQuestion>) =
        questions.iter().partition(|q| q.is_used);

    let mut prompt = String::new();

    prompt.push_str("## 회의 전사\n");
    prompt.push_str(truncate_chars(&transcript, SUMMARY_TRANSCRIPT_LIMIT));
    prompt.push_str("\n\n");

    prompt.push_str("## 사용된 질문\n");
    prompt.push_str(&question_list(&used));
    prompt.push_str("\n\n## 사용되지 않은 질문\n");
    prompt.push_str(&question_list(&unused));
    prompt.push_str("\n\n");

    prompt.push_str("## 출력 형식 (JSON)\n");
    prompt.push_str(
        r#"{"summary": "...", "key_points": [], "decisions": [], "action_items": [], "key_questions": [], "missed_questions": [], "next_meeting_agenda": [], "suggested_data_updates": {"mrr": 60000}}"#,
    );
    prompt.push_str("\n구체적인 숫자나 지표가 언급되었다면 suggested_data_updates에 지표별 값으로 넣으세요.");
    prompt.push_str("\n한국어로 작성하고 JSON만 출력하세요.\n");

    prompt
}

fn question_list(questions: &[&MeetingQuestion]) -> String {
    if questions.is_empty() {
        return "없음".to_string();
    }
    questions
        .iter()
        .take(SUMMARY_QUESTION_LIMIT)
        .map(|q| q.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Longest prefix of at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
