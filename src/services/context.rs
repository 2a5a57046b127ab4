use serde::Serialize;
use tracing::info;

use crate::heuristics::{
    analyze_transcripts_with, build_context_block, extract_answered_facts, HeuristicsConfig,
};
use crate::models::ConversationContext;

/// Everything the text heuristics derive from a conversation
#[derive(Debug, Clone, Serialize)]
pub struct ContextAnalysis {
    #[serde(flatten)]
    pub context: ConversationContext,
    /// Prompt-ready rendering of `context`
    pub context_block: String,
    /// Quantitative statements already answered in the dialogue
    pub answered_facts: Vec<String>,
}

/// Earlier utterances first, then the newest transcript
pub fn conversation_history(transcript: &str, previous: &[String]) -> Vec<String> {
    let mut history = Vec::with_capacity(previous.len() + 1);
    history.extend(previous.iter().cloned());
    history.push(transcript.to_string());
    history
}

pub fn analyze_context(transcript: &str, previous: &[String]) -> ConversationContext {
    analyze_context_with(transcript, previous, &HeuristicsConfig::default())
}

pub fn analyze_context_with(
    transcript: &str,
    previous: &[String],
    config: &HeuristicsConfig,
) -> ConversationContext {
    let history = conversation_history(transcript, previous);
    let context = analyze_transcripts_with(&history, config);

    info!(
        "Context: {} metrics, {} topics, stage {}",
        context.metrics_mentioned().len(),
        context.topics_discussed().len(),
        context.stage.as_str()
    );

    context
}

/// Context plus its prompt rendering and answered facts
pub fn describe_context(
    transcript: &str,
    previous: &[String],
    config: &HeuristicsConfig,
) -> ContextAnalysis {
    let history = conversation_history(transcript, previous);
    let context = analyze_context_with(transcript, previous, config);
    let context_block = build_context_block(&history, Some(&context));
    let answered_facts = extract_answered_facts(&history);

    ContextAnalysis {
        context,
        context_block,
        answered_facts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConversationStage, Metric};

    #[test]
    fn test_history_order() {
        let history = conversation_history("now", &["first".to_string(), "second".to_string()]);
        assert_eq!(history, vec!["first", "second", "now"]);
    }

    #[test]
    fn test_previous_transcripts_count() {
        let context = analyze_context("네 알겠습니다", &["LTV는 CAC의 세 배입니다".to_string()]);
        assert!(context.metrics_mentioned().contains(&Metric::Ltv));
        assert!(context.metrics_mentioned().contains(&Metric::Cac));
    }

    #[test]
    fn test_closing_phrase_in_recent_entries() {
        let previous: Vec<String> = (0..10).map(|i| format!("발화 {}", i)).collect();
        let context = analyze_context("오늘 정말 감사합니다", &previous);
        assert_eq!(context.stage, ConversationStage::Closing);
    }

    #[test]
    fn test_describe_context() {
        let analysis = describe_context("MRR은 5000만원입니다", &[], &HeuristicsConfig::default());

        assert!(analysis.context_block.starts_with("이미 언급된 지표: MRR"));
        assert_eq!(analysis.answered_facts.len(), 1);
        assert!(analysis.answered_facts[0].contains("5000만원"));

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["stage"], "introduction");
        assert!(json["context_block"].is_string());
    }
}
