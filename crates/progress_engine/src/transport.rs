use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use stream_logging::stream_debug;

use crate::TransportError;

/// Response body as it arrives, chunk by chunk.
pub type ByteStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Result of issuing the request.
pub enum Opened {
    /// Non-success status; the JSON body's `error` field when present.
    Rejected { status: u16, message: Option<String> },
    Streaming(ByteStream),
}

impl fmt::Debug for Opened {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opened::Rejected { status, message } => f
                .debug_struct("Rejected")
                .field("status", status)
                .field("message", message)
                .finish(),
            Opened::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Sends `{"url": url}` downstream and returns the rejection or the body stream.
    async fn open(&self, url: &str) -> Result<Opened, TransportError>;
}

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/download".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP transport: one POST per session, body streamed as it arrives.
///
/// No overall request timeout is set; a long pipeline keeps the stream open
/// for as long as it runs.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    endpoint: reqwest::Url,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let endpoint = reqwest::Url::parse(&settings.endpoint)
            .map_err(|err| TransportError::InvalidEndpoint(err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn open(&self, url: &str) -> Result<Opened, TransportError> {
        let body = serde_json::json!({ "url": url }).to_string();
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            return Ok(Opened::Rejected {
                status: status.as_u16(),
                message: parse_error_body(&body),
            });
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error))
            .boxed();
        Ok(Opened::Streaming(stream))
    }
}

fn parse_error_body(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(err) => {
            stream_debug!("Rejection body is not a JSON error object: {}", err);
            None
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(err.to_string());
    }
    if err.is_connect() {
        return TransportError::Connect(err.to_string());
    }
    if err.is_body() || err.is_decode() {
        return TransportError::Body(err.to_string());
    }
    TransportError::Network(err.to_string())
}
