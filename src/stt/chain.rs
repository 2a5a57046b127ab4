use std::sync::Arc;

use tracing::{info, warn};

use super::{
    AudioInput, AudioTranscoder, DagloConfig, DagloProvider, ProviderOutcome, SttProvider,
    WhisperConfig, WhisperProvider,
};
use crate::error::{Error, Result};
use crate::models::SttResult;

/// Ordered list of STT providers tried until one succeeds
///
/// Unconfigured providers are skipped. `Retryable` moves on to the next
/// provider, `Fatal` ends the call. Every provider receives the caller's
/// original audio.
pub struct SttChain {
    providers: Vec<Arc<dyn SttProvider>>,
}

impl SttChain {
    pub fn new(providers: Vec<Arc<dyn SttProvider>>) -> Self {
        Self { providers }
    }

    /// Daglo first, then Whisper
    pub fn standard(
        daglo: DagloConfig,
        whisper: WhisperConfig,
        transcoder: Arc<dyn AudioTranscoder>,
    ) -> Self {
        Self::new(vec![
            Arc::new(DagloProvider::new(daglo, transcoder)),
            Arc::new(WhisperProvider::new(whisper)),
        ])
    }

    pub async fn transcribe(&self, audio: &AudioInput) -> Result<SttResult> {
        let mut failures: Vec<String> = Vec::new();

        for provider in &self.providers {
            let tag = provider.tag();

            if !provider.is_configured() {
                info!("Skipping {} (no credentials)", tag);
                failures.push(format!("{}: not configured", tag));
                continue;
            }

            info!("Transcribing {} bytes with {}", audio.bytes.len(), tag);
            match provider.transcribe(audio).await {
                ProviderOutcome::Success(result) => {
                    info!(
                        "{} succeeded: {} chars, {} segments, {:.2}s",
                        tag,
                        result.text.len(),
                        result.segments.len(),
                        result.latency_seconds
                    );
                    return Ok(result);
                }
                ProviderOutcome::Retryable(reason) => {
                    warn!("{} failed, falling back: {}", tag, reason);
                    failures.push(format!("{}: {}", tag, reason));
                }
                ProviderOutcome::Fatal(reason) => {
                    warn!("{} failed: {}", tag, reason);
                    failures.push(format!("{}: {}", tag, reason));
                    break;
                }
            }
        }

        if failures.is_empty() {
            failures.push("no providers".to_string());
        }
        Err(Error::TranscriptionUnavailable(failures.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderTag;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider returning a scripted outcome and recording the audio it saw
    struct Scripted {
        tag: ProviderTag,
        configured: bool,
        outcome: ProviderOutcome,
        seen: Mutex<Vec<Vec<u8>>>,
    }

    impl Scripted {
        fn new(tag: ProviderTag, configured: bool, outcome: ProviderOutcome) -> Arc<Self> {
            Arc::new(Self {
                tag,
                configured,
                outcome,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SttProvider for Scripted {
        fn tag(&self) -> ProviderTag {
            self.tag
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn transcribe(&self, audio: &AudioInput) -> ProviderOutcome {
            self.seen.lock().unwrap().push(audio.bytes.clone());
            self.outcome.clone()
        }
    }

    fn ok(text: &str, tag: ProviderTag) -> ProviderOutcome {
        ProviderOutcome::Success(SttResult::flat(text.to_string(), 0.0, 0.0, tag))
    }

    fn audio() -> AudioInput {
        AudioInput::new(b"original".to_vec(), "clip.webm")
    }

    #[tokio::test]
    async fn test_primary_success_stops_chain() {
        let primary = Scripted::new(ProviderTag::Daglo, true, ok("primary", ProviderTag::Daglo));
        let secondary = Scripted::new(ProviderTag::Whisper, true, ok("secondary", ProviderTag::Whisper));
        let chain = SttChain::new(vec![primary.clone(), secondary.clone()]);

        let result = chain.transcribe(&audio()).await.unwrap();

        assert_eq!(result.provider, ProviderTag::Daglo);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_retryable_falls_back_with_original_bytes() {
        let primary = Scripted::new(
            ProviderTag::Daglo,
            true,
            ProviderOutcome::Retryable("empty transcript".into()),
        );
        let secondary = Scripted::new(ProviderTag::Whisper, true, ok("secondary", ProviderTag::Whisper));
        let chain = SttChain::new(vec![primary.clone(), secondary.clone()]);

        let result = chain.transcribe(&audio()).await.unwrap();

        assert_eq!(result.provider, ProviderTag::Whisper);
        assert_eq!(secondary.seen.lock().unwrap()[0], b"original".to_vec());
    }

    #[tokio::test]
    async fn test_unconfigured_primary_is_never_called() {
        let primary = Scripted::new(ProviderTag::Daglo, false, ok("primary", ProviderTag::Daglo));
        let secondary = Scripted::new(ProviderTag::Whisper, true, ok("secondary", ProviderTag::Whisper));
        let chain = SttChain::new(vec![primary.clone(), secondary.clone()]);

        let result = chain.transcribe(&audio()).await.unwrap();

        assert_eq!(result.provider, ProviderTag::Whisper);
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test]
    async fn test_fatal_stops_chain() {
        let primary = Scripted::new(ProviderTag::Daglo, true, ProviderOutcome::Fatal("corrupt".into()));
        let secondary = Scripted::new(ProviderTag::Whisper, true, ok("secondary", ProviderTag::Whisper));
        let chain = SttChain::new(vec![primary, secondary.clone()]);

        let err = chain.transcribe(&audio()).await.unwrap_err();

        assert!(err.is_transcription_unavailable());
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_both_failing_is_unavailable() {
        let primary = Scripted::new(ProviderTag::Daglo, true, ProviderOutcome::Retryable("500".into()));
        let secondary = Scripted::new(ProviderTag::Whisper, true, ProviderOutcome::Fatal("401".into()));
        let chain = SttChain::new(vec![primary, secondary]);

        let err = chain.transcribe(&audio()).await.unwrap_err();
        let message = err.to_string();

        assert!(err.is_transcription_unavailable());
        assert!(message.contains("daglo: 500"));
        assert!(message.contains("whisper: 401"));
    }

    #[tokio::test]
    async fn test_empty_chain_is_unavailable() {
        let chain = SttChain::new(vec![]);
        assert!(chain.transcribe(&audio()).await.unwrap_err().is_transcription_unavailable());
    }
}
