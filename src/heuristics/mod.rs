pub mod context_block;
pub mod extractor;
pub mod facts;
pub mod patterns;
pub mod redundancy;
pub mod speaker_roles;
pub mod stage;

pub use context_block::*;
pub use extractor::*;
pub use facts::*;
pub use redundancy::*;
pub use speaker_roles::*;
pub use stage::*;

use crate::models::ConversationContext;

/// Thresholds for the stage classifier and the speaker-role heuristic
#[derive(Debug, Clone)]
pub struct HeuristicsConfig {
    /// Number of most recent entries searched for closing language
    pub closing_lookback: usize,
    /// Below this many words the meeting is still in its introduction
    pub introduction_max_words: usize,
    /// Above this many words the meeting is considered to be closing
    pub closing_min_words: usize,
    /// Utterances with fewer non-whitespace characters get no role
    pub min_role_chars: usize,
    /// Minimum winning pattern score for a segment-level role
    pub min_role_score: u32,
    /// Extra interviewer score for a literal `?`
    pub question_mark_bonus: u32,
    /// Preceding segments inspected by the live role estimate
    pub live_question_lookback: usize,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            closing_lookback: 5,
            introduction_max_words: 200,
            closing_min_words: 1000,
            min_role_chars: 5,
            min_role_score: 2,
            question_mark_bonus: 2,
            live_question_lookback: 3,
        }
    }
}

/// Extract concepts and classify the stage in one pass over the transcripts
pub fn analyze_transcripts<S: AsRef<str>>(transcripts: &[S]) -> ConversationContext {
    analyze_transcripts_with(transcripts, &HeuristicsConfig::default())
}

pub fn analyze_transcripts_with<S: AsRef<str>>(
    transcripts: &[S],
    config: &HeuristicsConfig,
) -> ConversationContext {
    ConversationContext {
        concepts: extract_mentioned(transcripts),
        stage: classify_stage_with(transcripts, config),
    }
}
