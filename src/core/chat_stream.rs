//! Streaming transport for chat requests.
//!
//! One spawned task per request: it POSTs the question, reads the chunked
//! response body, and forwards decoded fragments over an unbounded channel
//! tagged with a stream id so late events from an abandoned request can be
//! told apart from the current one. The service never touches conversation
//! state; that separation keeps it independently testable.

use std::fmt;

use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::api::{AskRequest, BackendErrorBody};
use crate::core::decode::Utf8StreamDecoder;
use crate::utils::url::endpoint_url;

#[derive(Clone, Debug)]
pub enum StreamMessage {
    /// One decoded fragment of the answer, in arrival order.
    Chunk(String),
    Error(StreamError),
    End,
}

#[derive(Clone, Debug)]
pub enum StreamError {
    /// The backend answered with a non-success status.
    Http { status: u16, detail: Option<String> },
    /// The request could not be sent or the connection dropped mid-stream.
    Network(String),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Http { status, detail } => match detail {
                Some(detail) => write!(f, "backend returned HTTP {status}: {detail}"),
                None => write!(f, "backend returned HTTP {status}"),
            },
            StreamError::Network(reason) => write!(f, "network error: {reason}"),
        }
    }
}

/// Pull a human-readable summary out of a failure response body. The backend
/// sends `{"error": "..."}`; anything else is used as-is.
fn summarize_error_body(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<BackendErrorBody>(body) {
        if let Some(error) = parsed.error {
            return Some(error);
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub struct StreamParams {
    pub client: reqwest::Client,
    pub base_url: String,
    pub question: String,
    pub cancel_token: tokio_util::sync::CancellationToken,
    pub stream_id: u64,
}

#[derive(Clone)]
pub struct ChatStreamService {
    tx: mpsc::UnboundedSender<(StreamMessage, u64)>,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(StreamMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Issue one chat request on a background task. Terminal events: every
    /// path ends with `End`, preceded by `Error` on failure, except
    /// cancellation, which stops the task silently and leaves finalization
    /// to the caller.
    pub fn spawn_stream(&self, params: StreamParams) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let StreamParams {
                client,
                base_url,
                question,
                cancel_token,
                stream_id,
            } = params;

            tokio::select! {
                _ = run_request(client, base_url, question, &tx, stream_id, &cancel_token) => {}
                _ = cancel_token.cancelled() => {}
            }
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: StreamMessage, stream_id: u64) {
        let _ = self.tx.send((message, stream_id));
    }
}

async fn run_request(
    client: reqwest::Client,
    base_url: String,
    question: String,
    tx: &mpsc::UnboundedSender<(StreamMessage, u64)>,
    stream_id: u64,
    cancel_token: &tokio_util::sync::CancellationToken,
) {
    let chat_url = endpoint_url(&base_url, "chat");
    let request = AskRequest { question };

    match client.post(chat_url).json(&request).send().await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let error = StreamError::Http {
                    status: status.as_u16(),
                    detail: summarize_error_body(&body),
                };
                let _ = tx.send((StreamMessage::Error(error), stream_id));
                let _ = tx.send((StreamMessage::End, stream_id));
                return;
            }

            // The response body is dropped on every exit below, which
            // releases the underlying connection.
            let mut body = response.bytes_stream();
            let mut decoder = Utf8StreamDecoder::new();

            while let Some(chunk) = body.next().await {
                if cancel_token.is_cancelled() {
                    return;
                }
                match chunk {
                    Ok(bytes) => {
                        let text = decoder.decode(&bytes);
                        if !text.is_empty() {
                            let _ = tx.send((StreamMessage::Chunk(text), stream_id));
                        }
                    }
                    Err(e) => {
                        let error = StreamError::Network(e.to_string());
                        let _ = tx.send((StreamMessage::Error(error), stream_id));
                        let _ = tx.send((StreamMessage::End, stream_id));
                        return;
                    }
                }
            }

            let tail = decoder.finish();
            if !tail.is_empty() {
                let _ = tx.send((StreamMessage::Chunk(tail), stream_id));
            }
            let _ = tx.send((StreamMessage::End, stream_id));
        }
        Err(e) => {
            let error = StreamError::Network(e.to_string());
            let _ = tx.send((StreamMessage::Error(error), stream_id));
            let _ = tx.send((StreamMessage::End, stream_id));
        }
    }
}
