use crate::models::ConversationContext;

use super::analyze_transcripts;

/// Returned when there is nothing to tell the generator
pub const NO_CONTEXT: &str = "맥락 정보 없음";

/// Render the conversation context as lines for a generation prompt
///
/// One line each for mentioned metrics, discussed topics and the stage.
/// The stage line is omitted when there is no dialogue at all, so an empty
/// conversation yields [`NO_CONTEXT`].
pub fn build_context_block<S: AsRef<str>>(
    transcripts: &[S],
    context: Option<&ConversationContext>,
) -> String {
    let computed;
    let context = match context {
        Some(context) => context,
        None => {
            computed = analyze_transcripts(transcripts);
            &computed
        }
    };

    let mut lines = Vec::new();

    if !context.metrics_mentioned().is_empty() {
        let metrics: Vec<&str> = context.metrics_mentioned().iter().map(|m| m.name()).collect();
        lines.push(format!("이미 언급된 지표: {}", metrics.join(", ")));
    }

    if !context.topics_discussed().is_empty() {
        let topics: Vec<&str> = context
            .topics_discussed()
            .iter()
            .map(|t| t.display_name())
            .collect();
        lines.push(format!("이미 논의된 주제: {}", topics.join(", ")));
    }

    let has_dialogue = transcripts.iter().any(|t| !t.as_ref().trim().is_empty());
    if has_dialogue {
        lines.push(format!("대화 단계: {}", context.stage.display_name()));
    }

    if lines.is_empty() {
        NO_CONTEXT.to_string()
    } else {
        lines.join("\n")
    }
}
