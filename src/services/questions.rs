use chrono::Utc;
use tracing::{info, warn};

use crate::heuristics::{filter_redundant, HeuristicsConfig};
use crate::llm::{
    build_question_prompt, fallback_question, parse_questions, CompletionBackend, ParseOutcome,
    QUESTION_SYSTEM_PROMPT,
};
use crate::models::{CandidateQuestion, ConversationContext, QuestionSet};

use super::{conversation_history, describe_context};

/// Drop candidates that re-ask what the conversation already covered
pub fn filter_questions(
    candidates: Vec<CandidateQuestion>,
    context: &ConversationContext,
) -> Vec<CandidateQuestion> {
    filter_redundant(candidates, context)
}

/// Ask the model for follow-up questions and keep only the new ones
///
/// Transport errors and unusable output both fall back to one generic
/// question, so this never fails.
pub async fn generate_questions(
    backend: &dyn CompletionBackend,
    transcript: &str,
    previous: &[String],
    config: &HeuristicsConfig,
) -> QuestionSet {
    let analysis = describe_context(transcript, previous, config);
    let history = conversation_history(transcript, previous).join("\n");
    let prompt = build_question_prompt(&history, &analysis.context_block, &analysis.answered_facts);

    let outcome = match backend.complete(QUESTION_SYSTEM_PROMPT, &prompt).await {
        Ok(raw) => parse_questions(&raw),
        Err(e) => ParseOutcome::ParseFailed(format!("completion failed: {:#}", e)),
    };

    let (candidates, used_fallback) = match outcome {
        ParseOutcome::Parsed(questions) => (questions, false),
        ParseOutcome::ParseFailed(reason) => {
            warn!("Question generation fell back: {}", reason);
            (vec![fallback_question()], true)
        }
    };

    let total = candidates.len();
    let questions = filter_questions(candidates, &analysis.context);
    let filtered_out = total - questions.len();

    info!(
        "Generated {} questions ({} filtered, fallback={})",
        questions.len(),
        filtered_out,
        used_fallback
    );

    QuestionSet {
        questions,
        stage: analysis.context.stage,
        filtered_out,
        used_fallback,
        generated_at: Utc::now(),
    }
}
