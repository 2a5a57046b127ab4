use crate::models::ConversationStage;

use super::HeuristicsConfig;
use super::patterns::CLOSING_PHRASES;

/// Estimate where the meeting currently is, with default thresholds
pub fn classify_stage<S: AsRef<str>>(transcripts: &[S]) -> ConversationStage {
    classify_stage_with(transcripts, &HeuristicsConfig::default())
}

/// Estimate where the meeting currently is
///
/// 1. Closing language in the most recent entries wins outright
/// 2. Otherwise the total word count across all entries decides
pub fn classify_stage_with<S: AsRef<str>>(
    transcripts: &[S],
    config: &HeuristicsConfig,
) -> ConversationStage {
    if transcripts.is_empty() {
        return ConversationStage::Introduction;
    }

    let recent_start = transcripts.len().saturating_sub(config.closing_lookback);
    let recent = super::join_transcripts(&transcripts[recent_start..]);

    if CLOSING_PHRASES.iter().any(|phrase| recent.contains(phrase)) {
        return ConversationStage::Closing;
    }

    let total_words: usize = transcripts
        .iter()
        .map(|t| t.as_ref().split_whitespace().count())
        .sum();

    if total_words < config.introduction_max_words {
        ConversationStage::Introduction
    } else if total_words > config.closing_min_words {
        ConversationStage::Closing
    } else {
        ConversationStage::DeepDive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["단어"; n].join(" ")
    }

    #[test]
    fn test_empty_is_introduction() {
        let empty: Vec<&str> = vec![];
        assert_eq!(classify_stage(&empty), ConversationStage::Introduction);
    }

    #[test]
    fn test_word_count_thresholds() {
        assert_eq!(classify_stage(&[words(199)]), ConversationStage::Introduction);
        assert_eq!(classify_stage(&[words(200)]), ConversationStage::DeepDive);
        assert_eq!(classify_stage(&[words(1000)]), ConversationStage::DeepDive);
        assert_eq!(classify_stage(&[words(1001)]), ConversationStage::Closing);
    }

    #[test]
    fn test_word_count_spans_all_entries() {
        let transcripts: Vec<String> = (0..10).map(|_| words(30)).collect();
        assert_eq!(classify_stage(&transcripts), ConversationStage::DeepDive);
    }

    #[test]
    fn test_closing_phrase_in_recent_entries_wins() {
        let transcripts = vec!["안녕하세요".to_string(), "오늘 시간 내주셔서 감사합니다".to_string()];
        assert_eq!(classify_stage(&transcripts), ConversationStage::Closing);
    }

    #[test]
    fn test_closing_phrase_outside_recent_window_is_ignored() {
        let mut transcripts = vec!["감사합니다".to_string()];
        transcripts.extend((0..5).map(|_| "네 그렇습니다".to_string()));
        assert_eq!(classify_stage(&transcripts), ConversationStage::Introduction);
    }

    #[test]
    fn test_closing_phrase_beats_low_word_count() {
        let transcripts = vec![words(10), "다음 단계로 넘어가죠".to_string()];
        assert_eq!(classify_stage(&transcripts), ConversationStage::Closing);
    }

    #[test]
    fn test_thanks_closes_regardless_of_total_words() {
        let mut transcripts: Vec<String> = (0..20).map(|_| words(40)).collect();
        transcripts.push("네 감사합니다".to_string());
        assert_eq!(classify_stage(&transcripts), ConversationStage::Closing);
    }
}
