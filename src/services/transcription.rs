use tracing::info;

use crate::error::Result;
use crate::heuristics::{tag_roles, HeuristicsConfig};
use crate::io::format_transcript;
use crate::models::{SttResult, TranscriptSegment};
use crate::stt::{AudioInput, DagloProvider, SttChain};

/// Transcribe uploaded audio through the provider chain
pub async fn transcribe(chain: &SttChain, audio: &AudioInput) -> Result<SttResult> {
    let result = chain.transcribe(audio).await?;
    info!(
        "Transcribed {} with {} in {:.2}s",
        audio.filename, result.provider, result.latency_seconds
    );
    Ok(result)
}

/// Transcribe a hosted recording with speaker separation
pub async fn transcribe_url(provider: &DagloProvider, audio_url: &str) -> Result<SttResult> {
    provider.transcribe_url(audio_url).await
}

/// Assign a per-speaker role to every segment
pub fn tag_speaker_roles(
    mut segments: Vec<TranscriptSegment>,
    config: &HeuristicsConfig,
) -> Vec<TranscriptSegment> {
    tag_roles(&mut segments, config);
    segments
}

/// Tag the result's segments and re-render its formatted text with roles
pub fn annotate_roles(result: &mut SttResult, config: &HeuristicsConfig) {
    if result.segments.is_empty() {
        return;
    }
    tag_roles(&mut result.segments, config);
    result.formatted_text = format_transcript(&result.segments);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{ProviderTag, SpeakerRole};
    use crate::stt::{
        AudioTranscoder, DagloConfig, FfmpegTranscoder, PcmFormat, TranscoderConfig, WhisperConfig,
    };
    use async_trait::async_trait;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Real transcoder wrapped with a call counter
    struct Counting {
        inner: FfmpegTranscoder,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AudioTranscoder for Counting {
        async fn to_pcm_wav(&self, audio: &AudioInput, format: PcmFormat) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.to_pcm_wav(audio, format).await
        }
    }

    fn counting_transcoder(scratch: &Path) -> Arc<Counting> {
        Arc::new(Counting {
            inner: FfmpegTranscoder::new(TranscoderConfig {
                scratch_dir: Some(scratch.to_path_buf()),
                ..Default::default()
            }),
            calls: AtomicUsize::new(0),
        })
    }

    fn whisper_config(url: &str) -> WhisperConfig {
        WhisperConfig {
            api_key: Some("sk-test".to_string()),
            base_url: url.to_string(),
            ..Default::default()
        }
    }

    fn pcm_wav() -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..1600 {
                writer.write_sample(0i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[tokio::test]
    async fn test_without_primary_credential_goes_straight_to_secondary() {
        let mut server = mockito::Server::new_async().await;
        let primary = server
            .mock("POST", "/sync/transcripts")
            .expect(0)
            .create_async()
            .await;
        let _secondary = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body(r#"{"text": "안녕하세요 반갑습니다", "duration": 2.0}"#)
            .create_async()
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let transcoder = counting_transcoder(scratch.path());
        let chain = SttChain::standard(
            DagloConfig {
                api_token: None,
                base_url: server.url(),
                ..Default::default()
            },
            whisper_config(&server.url()),
            transcoder.clone(),
        );

        let audio = AudioInput::new(b"\x1aE\xdf\xa3 webm".to_vec(), "clip.webm");
        let result = transcribe(&chain, &audio).await.unwrap();

        assert_eq!(result.provider, ProviderTag::Whisper);
        assert_eq!(transcoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
        primary.assert_async().await;
    }

    #[tokio::test]
    async fn test_blank_primary_transcript_falls_back() {
        let mut server = mockito::Server::new_async().await;
        let primary = server
            .mock("POST", "/sync/transcripts")
            .with_status(200)
            .with_body(r#"{"sttResult": {"transcript": "  \n "}}"#)
            .create_async()
            .await;
        let _secondary = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body(r#"{"text": "매출은 얼마인가요"}"#)
            .create_async()
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let transcoder = counting_transcoder(scratch.path());
        let chain = SttChain::standard(
            DagloConfig {
                api_token: Some("dg".to_string()),
                base_url: server.url(),
                ..Default::default()
            },
            whisper_config(&server.url()),
            transcoder.clone(),
        );

        // Already in the primary's PCM format, so no transcoder is needed
        let audio = AudioInput::new(pcm_wav(), "clip.wav");
        let result = transcribe(&chain, &audio).await.unwrap();

        primary.assert_async().await;
        assert_eq!(result.provider, ProviderTag::Whisper);
        assert_eq!(result.text, "매출은 얼마인가요");
        assert_eq!(transcoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unresponsive_primary_falls_back_in_time() {
        let mut server = mockito::Server::new_async().await;
        let secondary = server
            .mock("POST", "/audio/transcriptions")
            .with_status(200)
            .with_body(r#"{"text": "고객은 120곳입니다"}"#)
            .create_async()
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let chain = SttChain::standard(
            DagloConfig {
                api_token: Some("dg".to_string()),
                base_url: crate::stt::test_servers::silent().await,
                request_timeout: Duration::from_millis(200),
                ..Default::default()
            },
            whisper_config(&server.url()),
            counting_transcoder(scratch.path()),
        );

        let audio = AudioInput::new(pcm_wav(), "clip.wav");
        let result = tokio::time::timeout(Duration::from_secs(5), transcribe(&chain, &audio))
            .await
            .expect("a silent primary should not stall the chain")
            .unwrap();

        secondary.assert_async().await;
        assert_eq!(result.provider, ProviderTag::Whisper);
        assert_eq!(result.text, "고객은 120곳입니다");
    }

    #[tokio::test]
    async fn test_both_providers_failing_is_distinguishable() {
        let mut server = mockito::Server::new_async().await;
        let _primary = server
            .mock("POST", "/sync/transcripts")
            .with_status(503)
            .create_async()
            .await;
        let _secondary = server
            .mock("POST", "/audio/transcriptions")
            .with_status(500)
            .create_async()
            .await;

        let scratch = tempfile::tempdir().unwrap();
        let chain = SttChain::standard(
            DagloConfig {
                api_token: Some("dg".to_string()),
                base_url: server.url(),
                ..Default::default()
            },
            whisper_config(&server.url()),
            counting_transcoder(scratch.path()),
        );

        let err = transcribe(&chain, &AudioInput::new(pcm_wav(), "clip.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TranscriptionUnavailable(_)));
    }

    #[test]
    fn test_role_reconciliation_majority() {
        let segments = vec![
            TranscriptSegment::new("화자1", "MRR은 얼마인가요? 성장률은요?", 0.0),
            TranscriptSegment::new("화자1", "CAC는 어떻게 되나요? 경쟁사는요?", 10.0),
            TranscriptSegment::new("화자1", "저희는 현재 매출이 30% 성장하고 있습니다", 20.0),
        ];

        let tagged = tag_speaker_roles(segments, &HeuristicsConfig::default());

        assert!(tagged
            .iter()
            .all(|s| s.role == Some(SpeakerRole::Interviewer)));
    }

    #[test]
    fn test_annotate_roles_rerenders_text() {
        let mut result = SttResult {
            text: "MRR은 얼마인가요? 성장률은요? 저희는 현재 매출이 30% 성장하고 있습니다".to_string(),
            formatted_text: String::new(),
            segments: vec![
                TranscriptSegment::new("화자1", "MRR은 얼마인가요? 성장률은요?", 0.0),
                TranscriptSegment::new("화자2", "저희는 현재 매출이 30% 성장하고 있습니다", 4.0),
            ],
            duration_seconds: 0.0,
            latency_seconds: 0.0,
            provider: ProviderTag::DagloAsync,
        };

        annotate_roles(&mut result, &HeuristicsConfig::default());

        assert!(result.formatted_text.starts_with("화자1 (interviewer) 00:00"));
        assert!(result.formatted_text.contains("화자2 (subject) 00:04"));
    }
}
