//! Error kinds surfaced by the transcription side of the crate.
//!
//! Text heuristics never fail and the question/summary paths recover
//! locally, so only transcription needs a distinguishable error for callers
//! deciding between an error response and a degraded empty result.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Every provider in the chain failed, or an async job never finished.
    /// Callers may substitute [`crate::models::SttResult::unavailable`].
    #[error("transcription unavailable: {0}")]
    TranscriptionUnavailable(String),

    /// The external transcoder could not produce the required PCM audio
    #[error("audio transcoding failed: {0}")]
    Transcode(String),

    /// Missing or invalid settings
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_transcription_unavailable(&self) -> bool {
        matches!(self, Error::TranscriptionUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
