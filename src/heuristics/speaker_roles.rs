use std::collections::HashMap;

use tracing::info;

use crate::models::{SpeakerRole, TranscriptSegment};

use super::HeuristicsConfig;
use super::patterns::{INTERVIEWER_PATTERNS, SUBJECT_PATTERNS};

/// Pattern scores for a single utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleScore {
    pub interviewer: u32,
    pub subject: u32,
}

/// Count interviewer-style and subject-style pattern hits in `text`
pub fn score_utterance(text: &str, config: &HeuristicsConfig) -> RoleScore {
    let mut interviewer = INTERVIEWER_PATTERNS
        .iter()
        .filter(|p| p.is_match(text))
        .count() as u32;
    let subject = SUBJECT_PATTERNS.iter().filter(|p| p.is_match(text)).count() as u32;

    if text.contains('?') {
        interviewer += config.question_mark_bonus;
    }

    RoleScore {
        interviewer,
        subject,
    }
}

/// Classify one utterance on its own text
pub fn estimate_role(text: &str, config: &HeuristicsConfig) -> SpeakerRole {
    let visible_chars = text.chars().filter(|c| !c.is_whitespace()).count();
    if visible_chars < config.min_role_chars {
        return SpeakerRole::Unknown;
    }

    let score = score_utterance(text, config);
    if score.interviewer > score.subject && score.interviewer >= config.min_role_score {
        SpeakerRole::Interviewer
    } else if score.subject > score.interviewer && score.subject >= config.min_role_score {
        SpeakerRole::Subject
    } else {
        SpeakerRole::Unknown
    }
}

/// Per-speaker tally of segment-level role votes
#[derive(Debug, Clone, Copy, Default)]
struct RoleVotes {
    interviewer: usize,
    subject: usize,
}

impl RoleVotes {
    fn add(&mut self, role: SpeakerRole) {
        match role {
            SpeakerRole::Interviewer => self.interviewer += 1,
            SpeakerRole::Subject => self.subject += 1,
            SpeakerRole::Unknown => {}
        }
    }

    fn winner(&self) -> SpeakerRole {
        if self.interviewer > self.subject {
            SpeakerRole::Interviewer
        } else if self.subject > self.interviewer {
            SpeakerRole::Subject
        } else {
            SpeakerRole::Unknown
        }
    }
}

/// Tag every segment with a role that is stable per speaker label
///
/// Each segment votes on its own text, then every segment of a speaker gets
/// that speaker's majority role, so one short or ambiguous turn cannot flip
/// a speaker's role mid-conversation.
pub fn tag_roles(segments: &mut [TranscriptSegment], config: &HeuristicsConfig) {
    if segments.is_empty() {
        return;
    }

    let mut votes: HashMap<&str, RoleVotes> = HashMap::new();
    for segment in segments.iter() {
        let role = estimate_role(&segment.text, config);
        votes.entry(segment.speaker.as_str()).or_default().add(role);
    }

    let final_roles: HashMap<String, SpeakerRole> = votes
        .into_iter()
        .map(|(speaker, tally)| (speaker.to_string(), tally.winner()))
        .collect();

    for segment in segments.iter_mut() {
        segment.role = Some(
            final_roles
                .get(&segment.speaker)
                .copied()
                .unwrap_or_default(),
        );
    }

    info!("Speaker roles analyzed: {:?}", final_roles);
}

/// Classify a live utterance before a reconciliation pass is possible
///
/// An otherwise unknown utterance that follows a question within the last
/// few segments is taken as an answer.
pub fn estimate_live_role(
    text: &str,
    previous: &[TranscriptSegment],
    config: &HeuristicsConfig,
) -> SpeakerRole {
    let role = estimate_role(text, config);
    if role != SpeakerRole::Unknown {
        return role;
    }

    let follows_question = previous
        .iter()
        .rev()
        .take(config.live_question_lookback)
        .any(|segment| segment.text.contains('?'));

    if follows_question {
        SpeakerRole::Subject
    } else {
        SpeakerRole::Unknown
    }
}
