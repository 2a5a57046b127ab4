//! Best-effort parsing of model output.
//!
//! Models wrap JSON in markdown fences, prefix it with prose, or drop fields.
//! Everything here degrades to an explicit failure value instead of an error.

use serde_json::Value;
use tracing::warn;

use crate::models::{CandidateQuestion, MeetingSummary, Priority};

/// Result of reading a question list out of raw model text
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(Vec<CandidateQuestion>),
    ParseFailed(String),
}

/// Text of the generic question used when model output is unusable
pub const FALLBACK_QUESTION_TEXT: &str = "이 부분에 대해 좀 더 자세히 설명해주시겠어요?";
pub const FALLBACK_QUESTION_CATEGORY: &str = "GENERAL";

pub fn fallback_question() -> CandidateQuestion {
    CandidateQuestion::new(
        FALLBACK_QUESTION_TEXT,
        FALLBACK_QUESTION_CATEGORY,
        Priority::Score(5),
    )
    .with_reason("추가 정보 필요")
}

/// Strip a leading markdown fence (and its `json` tag) from model output
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find("```") {
        Some(end) => &rest[..end],
        None => rest,
    };
    body.strip_prefix("json").unwrap_or(body).trim()
}

/// Parse the first JSON object found in `raw`
pub fn parse_json_object(raw: &str) -> Result<Value, String> {
    let body = strip_code_fence(raw);
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(body) {
        return Ok(value);
    }

    let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) else {
        return Err("no JSON object in model output".to_string());
    };
    if end < start {
        return Err("no JSON object in model output".to_string());
    }

    match serde_json::from_str::<Value>(&body[start..=end]) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err("model output is not a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {}", e)),
    }
}

/// Read `{"questions": [...]}` out of model text
///
/// Items that are not valid questions, or have blank text, are skipped.
pub fn parse_questions(raw: &str) -> ParseOutcome {
    let value = match parse_json_object(raw) {
        Ok(v) => v,
        Err(reason) => return ParseOutcome::ParseFailed(reason),
    };

    let Some(items) = value.get("questions").and_then(Value::as_array) else {
        return ParseOutcome::ParseFailed("missing \"questions\" array".to_string());
    };

    let mut questions = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match serde_json::from_value::<CandidateQuestion>(item.clone()) {
            Ok(q) if !q.text.trim().is_empty() => questions.push(q),
            Ok(_) => warn!("Skipping question {} with empty text", i),
            Err(e) => warn!("Skipping malformed question {}: {}", i, e),
        }
    }

    ParseOutcome::Parsed(questions)
}

/// Read a meeting summary out of model text, `None` when unusable
pub fn parse_summary(raw: &str) -> Option<MeetingSummary> {
    let value = match parse_json_object(raw) {
        Ok(v) => v,
        Err(reason) => {
            warn!("Summary output unusable: {}", reason);
            return None;
        }
    };

    match serde_json::from_value(value) {
        Ok(summary) => Some(summary),
        Err(e) => {
            warn!("Summary output has unexpected shape: {}", e);
            None
        }
    }
}
