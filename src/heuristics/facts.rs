use std::collections::BTreeSet;

use super::join_transcripts;
use super::patterns::FACT_PATTERNS;

/// Maximum number of fact snippets returned
pub const MAX_ANSWERED_FACTS: usize = 10;

/// Collect snippets around quantitative statements already made
///
/// Amounts, percentages, head counts, months and years are strong signals
/// that a question about them has been answered. Each snippet carries up to
/// 50 characters of context on either side.
pub fn extract_answered_facts<S: AsRef<str>>(transcripts: &[S]) -> Vec<String> {
    let combined = join_transcripts(transcripts);

    let snippets: BTreeSet<String> = FACT_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.find_iter(&combined))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    snippets.into_iter().take(MAX_ANSWERED_FACTS).collect()
}
