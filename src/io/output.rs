use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{SpeakerRole, TranscriptSegment};

/// Format seconds as MM:SS (minutes keep counting past 59)
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Render segments as speaker blocks
///
/// Consecutive segments of the same speaker are merged into one block:
///
/// ```text
/// 화자1 00:02
/// 발화 내용...
///
/// 화자2 (subject) 01:29
/// 발화 내용...
/// ```
///
/// Blank segments contribute no text; a block without any text is dropped.
pub fn format_transcript(segments: &[TranscriptSegment]) -> String {
    let mut blocks: Vec<Block> = Vec::new();

    for segment in segments {
        let text = segment.text.trim();

        match blocks.last_mut() {
            Some(block) if block.speaker == segment.speaker => {
                if !text.is_empty() {
                    block.texts.push(text);
                }
            }
            _ => blocks.push(Block {
                speaker: &segment.speaker,
                role: segment.role,
                start_seconds: segment.start_time_seconds,
                texts: if text.is_empty() { vec![] } else { vec![text] },
            }),
        }
    }

    blocks
        .iter()
        .filter(|b| !b.texts.is_empty())
        .map(Block::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

struct Block<'a> {
    speaker: &'a str,
    role: Option<SpeakerRole>,
    start_seconds: f64,
    texts: Vec<&'a str>,
}

impl Block<'_> {
    fn render(&self) -> String {
        let header = match self.role {
            Some(role) if role != SpeakerRole::Unknown => format!(
                "{} ({}) {}",
                self.speaker,
                role.as_str(),
                format_timestamp(self.start_seconds)
            ),
            _ => format!("{} {}", self.speaker, format_timestamp(self.start_seconds)),
        };
        format!("{}\n{}", header, self.texts.join(" "))
    }
}

/// Write any serializable value as pretty JSON
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}

/// Write plain text to a file
pub fn write_text(text: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    write!(file, "{}", text)?;
    Ok(())
}
