use std::io::Cursor;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::AudioInput;
use crate::error::{Error, Result};

/// Target encoding of the primary provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

impl PcmFormat {
    /// Whether `bytes` is already a WAV file in exactly this PCM format
    pub fn matches(&self, bytes: &[u8]) -> bool {
        match hound::WavReader::new(Cursor::new(bytes)) {
            Ok(reader) => {
                let spec = reader.spec();
                spec.sample_format == hound::SampleFormat::Int
                    && spec.sample_rate == self.sample_rate
                    && spec.channels == self.channels
                    && spec.bits_per_sample == self.bits_per_sample
            }
            Err(_) => false,
        }
    }
}

/// Converts arbitrary compressed audio into PCM WAV
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    async fn to_pcm_wav(&self, audio: &AudioInput, format: PcmFormat) -> Result<Vec<u8>>;
}

/// Configuration for the ffmpeg process
#[derive(Debug, Clone)]
pub struct TranscoderConfig {
    /// ffmpeg executable (from FFMPEG_PATH, defaults to `ffmpeg` on PATH)
    pub program: PathBuf,
    /// Parent directory for scratch files; system temp dir when `None`
    pub scratch_dir: Option<PathBuf>,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            scratch_dir: None,
        }
    }
}

/// Transcoder backed by an ffmpeg child process
///
/// Input and output live in a private scratch directory that is removed
/// when the call returns, fails, or is cancelled. Cancelling also kills the
/// child process.
pub struct FfmpegTranscoder {
    config: TranscoderConfig,
}

impl FfmpegTranscoder {
    pub fn new(config: TranscoderConfig) -> Self {
        Self { config }
    }

    fn scratch_dir(&self) -> Result<tempfile::TempDir> {
        let builder = {
            let mut b = tempfile::Builder::new();
            b.prefix("meetlens-transcode-");
            b
        };
        let dir = match &self.config.scratch_dir {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn to_pcm_wav(&self, audio: &AudioInput, format: PcmFormat) -> Result<Vec<u8>> {
        let scratch = self.scratch_dir()?;
        let input_path = scratch.path().join(format!("input.{}", audio.extension()));
        let output_path = scratch.path().join("output.wav");

        tokio::fs::write(&input_path, &audio.bytes).await?;

        let codec = format!("pcm_s{}le", format.bits_per_sample);
        let output = Command::new(&self.config.program)
            .args(["-y", "-hide_banner", "-loglevel", "error", "-i"])
            .arg(&input_path)
            .args(["-ac", &format.channels.to_string()])
            .args(["-ar", &format.sample_rate.to_string()])
            .args(["-c:a", &codec, "-f", "wav"])
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                Error::Transcode(format!(
                    "failed to run {}: {}",
                    self.config.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Transcode(format!(
                "{} exited with {}: {}",
                self.config.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        let pcm = tokio::fs::read(&output_path).await?;
        debug!(
            "Transcoded {} bytes of {} into {} bytes of PCM",
            audio.bytes.len(),
            audio.extension(),
            pcm.len()
        );

        Ok(pcm)
    }
}
