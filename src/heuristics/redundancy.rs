use tracing::{debug, info};

use crate::models::{CandidateQuestion, ConversationContext, Topic};

/// Map a question category onto the topic it re-asks
pub fn topic_for_category(category: &str) -> Option<Topic> {
    match category.trim().to_uppercase().as_str() {
        "BUSINESS_MODEL" => Some(Topic::BusinessModel),
        "TRACTION" => Some(Topic::Traction),
        "TEAM" => Some(Topic::Team),
        "MARKET" => Some(Topic::Market),
        "TECHNOLOGY" => Some(Topic::Technology),
        "FINANCIALS" => Some(Topic::Funding),
        "RISKS" => Some(Topic::Risks),
        _ => None,
    }
}

/// Why a candidate question was considered already covered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redundancy {
    /// Category topic already discussed and a found keyword appears in the question
    TopicKeyword(String),
    /// A mentioned metric's name appears in the question
    Metric(String),
}

/// Check a single question against the conversation so far
///
/// This is a lexical substring test, not semantic deduplication: it keeps
/// questions that paraphrase covered material and drops questions that
/// happen to contain a covered keyword.
pub fn redundancy_of(
    question: &CandidateQuestion,
    context: &ConversationContext,
) -> Option<Redundancy> {
    let text = question.text.to_lowercase();

    if let Some(topic) = topic_for_category(&question.category) {
        if context.topics_discussed().contains(&topic) {
            let hit = context
                .keywords_found()
                .iter()
                .find(|keyword| text.contains(&keyword.to_lowercase()));
            if let Some(keyword) = hit {
                return Some(Redundancy::TopicKeyword(keyword.clone()));
            }
        }
    }

    context
        .metrics_mentioned()
        .iter()
        .map(|metric| metric.name().to_lowercase())
        .find(|name| text.contains(name.as_str()) || text.contains(&name.replace('_', " ")))
        .map(Redundancy::Metric)
}

/// Drop candidates that re-ask covered metrics or topics, preserving order
pub fn filter_redundant(
    questions: Vec<CandidateQuestion>,
    context: &ConversationContext,
) -> Vec<CandidateQuestion> {
    let total = questions.len();

    let kept: Vec<CandidateQuestion> = questions
        .into_iter()
        .filter(|question| match redundancy_of(question, context) {
            Some(reason) => {
                debug!(
                    "Filtered redundant question ({:?}): {}",
                    reason,
                    question.text.chars().take(50).collect::<String>()
                );
                false
            }
            None => true,
        })
        .collect();

    info!("Filtered {} redundant questions", total - kept.len());
    kept
}
