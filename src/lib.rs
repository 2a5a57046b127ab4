pub mod config;
pub mod error;
pub mod heuristics;
pub mod io;
pub mod llm;
pub mod models;
pub mod services;
pub mod stt;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use heuristics::{analyze_transcripts, build_context_block, HeuristicsConfig};
pub use io::{format_transcript, read_audio_file, read_transcript_file, write_json, write_text};
pub use llm::{AnthropicClient, AnthropicConfig, CompletionBackend, ParseOutcome};
pub use models::{
    CandidateQuestion, ConversationContext, ConversationStage, MeetingQuestion, MeetingSummary,
    ProviderTag, QuestionSet, SpeakerRole, SttResult, TranscriptSegment,
};
pub use services::{
    analyze_context, annotate_roles, describe_context, filter_questions, generate_questions,
    summarize_meeting, tag_speaker_roles, transcribe, transcribe_url,
};
pub use stt::{AudioInput, DagloProvider, FfmpegTranscoder, SttChain};
