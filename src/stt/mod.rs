pub mod chain;
pub mod daglo;
pub mod transcode;
pub mod whisper;

pub use chain::*;
pub use daglo::*;
pub use transcode::*;
pub use whisper::*;

use async_trait::async_trait;

use crate::models::{ProviderTag, SttResult};

/// Audio as uploaded by the caller; never modified by any provider
#[derive(Debug, Clone)]
pub struct AudioInput {
    pub bytes: Vec<u8>,
    /// Original file name, used for the container hint
    pub filename: String,
}

impl AudioInput {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }

    /// Lower-cased file extension, defaulting to `webm` (browser recordings)
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "webm".to_string())
    }

    pub fn mime_type(&self) -> &'static str {
        match self.extension().as_str() {
            "wav" => "audio/wav",
            "mp3" => "audio/mpeg",
            "m4a" | "mp4" => "audio/mp4",
            "ogg" | "oga" => "audio/ogg",
            "flac" => "audio/flac",
            _ => "audio/webm",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Result of one provider attempt
#[derive(Debug, Clone)]
pub enum ProviderOutcome {
    /// Accepted transcription
    Success(SttResult),
    /// This provider failed; the next provider in the chain may still succeed
    Retryable(String),
    /// No provider can succeed for this input; stop the chain
    Fatal(String),
}

/// One speech-to-text strategy in the fallback chain
#[async_trait]
pub trait SttProvider: Send + Sync {
    /// Tag attached to results produced by this provider
    fn tag(&self) -> ProviderTag;

    /// Whether credentials are present; unconfigured providers are skipped
    fn is_configured(&self) -> bool;

    /// Attempt a transcription of the original, untransformed audio
    async fn transcribe(&self, audio: &AudioInput) -> ProviderOutcome;
}

/// Raw TCP servers for exercising request timeouts
#[cfg(test)]
pub(crate) mod test_servers {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Accepts connections and never answers
    pub async fn silent() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });
        format!("http://{}", addr)
    }

    /// Answers every POST with `body`, leaves every other request hanging
    pub async fn answers_post_only(body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(handle(stream, body));
            }
        });
        format!("http://{}", addr)
    }

    /// Address with nothing listening on it
    pub async fn closed() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    async fn handle(mut stream: TcpStream, body: &'static str) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let header_end = loop {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        if !head.starts_with("POST") {
            // keep the connection open without a reply
            std::future::pending::<()>().await;
        }

        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + length {
            match stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_container_hints() {
        assert_eq!(AudioInput::new(vec![], "meeting.WAV").mime_type(), "audio/wav");
        assert_eq!(AudioInput::new(vec![], "clip.m4a").extension(), "m4a");
        assert_eq!(AudioInput::new(vec![], "blob").mime_type(), "audio/webm");
    }
}
