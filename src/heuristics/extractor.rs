use tracing::debug;

use crate::models::MentionedConcepts;

use super::patterns::{METRIC_PATTERNS, TOPIC_PATTERNS};

/// Join transcript entries with single spaces, the form every matcher sees
pub fn join_transcripts<S: AsRef<str>>(transcripts: &[S]) -> String {
    transcripts
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the metrics, topics and literal keywords already surfaced
///
/// Pure function of the concatenated text: calling it twice on the same
/// transcripts yields the same sets.
pub fn extract_mentioned<S: AsRef<str>>(transcripts: &[S]) -> MentionedConcepts {
    let combined = join_transcripts(transcripts);
    let mut concepts = MentionedConcepts::default();

    if combined.trim().is_empty() {
        return concepts;
    }

    for (metric, pattern) in METRIC_PATTERNS.iter() {
        let matches = pattern.find_all(&combined);
        if !matches.is_empty() {
            concepts.metrics_mentioned.insert(*metric);
            concepts
                .keywords_found
                .extend(matches.into_iter().map(str::to_string));
        }
    }

    for (topic, pattern) in TOPIC_PATTERNS.iter() {
        let matches = pattern.find_all(&combined);
        if !matches.is_empty() {
            concepts.topics_discussed.insert(*topic);
            concepts
                .keywords_found
                .extend(matches.into_iter().map(str::to_string));
        }
    }

    debug!(
        "Extracted metrics {:?}, topics {:?}",
        concepts.metrics_mentioned, concepts.topics_discussed
    );

    concepts
}
