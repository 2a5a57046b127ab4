use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::models::{TranscriptSegment, SPEAKER_LABEL_PREFIX};
use crate::stt::AudioInput;

/// `[speaker]: text` lines, as produced for summary prompts
static LABELED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]+)\]:\s*(.*)$").expect("valid regex"));

#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptFile {
    Segments(Vec<TranscriptSegment>),
    Texts(Vec<String>),
}

/// Read a transcript file into segments
///
/// Accepts a JSON array of segments, a JSON array of strings, or plain text
/// with one utterance per line (optionally `[speaker]: text`).
pub fn read_transcript_file(path: &Path) -> Result<Vec<TranscriptSegment>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_transcript(&content)
}

pub fn parse_transcript(content: &str) -> Result<Vec<TranscriptSegment>> {
    let trimmed = content.trim();
    let first_line = trimmed.lines().next().unwrap_or_default();
    if trimmed.starts_with('[') && !LABELED_LINE.is_match(first_line) {
        let parsed: TranscriptFile =
            serde_json::from_str(trimmed).context("Failed to parse transcript JSON")?;
        return Ok(match parsed {
            TranscriptFile::Segments(segments) => segments,
            TranscriptFile::Texts(texts) => texts
                .into_iter()
                .map(|t| TranscriptSegment::new(SPEAKER_LABEL_PREFIX, t, 0.0))
                .collect(),
        });
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match LABELED_LINE.captures(line) {
            Some(caps) => TranscriptSegment::new(caps[1].trim(), caps[2].trim(), 0.0),
            None => TranscriptSegment::new(SPEAKER_LABEL_PREFIX, line, 0.0),
        })
        .collect())
}

/// Read an audio file, keeping its name for the container hint
pub fn read_audio_file(path: &Path) -> Result<AudioInput> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio.webm")
        .to_string();
    Ok(AudioInput::new(bytes, filename))
}
