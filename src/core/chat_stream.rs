use std::error::Error;
use std::fmt;
use std::time::Duration;

use futures_util::StreamExt;
use memchr::memchr;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{ChatMessage, ChatRequest, ChatResponse};
use crate::core::app::actions::EventSink;

const DONE_MARKER: &str = "[DONE]";
const MAX_ERROR_DETAIL_CHARS: usize = 200;

/// One event produced by a streaming task. Every stream yields zero or more
/// `Chunk`s followed by exactly one `End` or `Error`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMessage {
    Chunk(String),
    Error(String),
    End,
}

/// Transport and protocol failures that end a stream.
#[derive(Debug)]
pub enum StreamError {
    Connect(reqwest::Error),
    Timeout(Duration),
    Status { code: u16, detail: Option<String> },
    Read(reqwest::Error),
    Api(String),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Connect(err) => write!(f, "Connection failed: {}", root_cause(err)),
            StreamError::Timeout(after) => {
                write!(f, "Request timed out after {}s", after.as_secs().max(1))
            }
            StreamError::Status { code, detail } => match detail {
                Some(detail) => write!(f, "HTTP {code}: {detail}"),
                None => write!(f, "HTTP {code}"),
            },
            StreamError::Read(err) => write!(f, "Stream interrupted: {}", root_cause(err)),
            StreamError::Api(summary) => write!(f, "API Error: {summary}"),
        }
    }
}

impl Error for StreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StreamError::Connect(err) | StreamError::Read(err) => Some(err),
            _ => None,
        }
    }
}

fn root_cause(err: &(dyn Error + 'static)) -> String {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}

/// Shared HTTP settings for every request the app makes.
#[derive(Clone, Debug)]
pub struct StreamSettings {
    pub client: reqwest::Client,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl StreamSettings {
    pub fn new(timeout: Duration, max_tokens: u32) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().connect_timeout(timeout).build()?;
        Ok(Self {
            client,
            max_tokens,
            timeout,
        })
    }
}

#[derive(Debug)]
pub struct StreamParams {
    pub client: reqwest::Client,
    pub url: String,
    pub api_key: String,
    pub provider_id: String,
    pub model: String,
    pub api_messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub cancel_token: CancellationToken,
    pub stream_id: u64,
}

/// Runs one request on the runtime, reporting through `sink`. The task
/// always emits exactly one terminal message unless the sink is closed.
pub fn spawn_stream(params: StreamParams, sink: EventSink) -> JoinHandle<()> {
    tokio::spawn(async move {
        let stream_id = params.stream_id;
        let cancel_token = params.cancel_token.clone();

        let terminal = tokio::select! {
            result = run_stream(params, &sink) => match result {
                Ok(()) => StreamMessage::End,
                Err(err) => {
                    warn!(stream_id, error = %err, "Stream failed");
                    StreamMessage::Error(err.to_string())
                }
            },
            _ = cancel_token.cancelled() => StreamMessage::Error("Request cancelled".to_string()),
        };

        debug!(stream_id, ?terminal, "Stream finished");
        sink.stream(stream_id, terminal);
    })
}

async fn run_stream(params: StreamParams, sink: &EventSink) -> Result<(), StreamError> {
    let StreamParams {
        client,
        url,
        api_key,
        provider_id,
        model,
        api_messages,
        max_tokens,
        timeout: read_timeout,
        stream_id,
        ..
    } = params;

    let request = ChatRequest {
        model,
        messages: api_messages,
        max_tokens,
        stream: true,
    };

    debug!(
        stream_id,
        provider = %provider_id,
        model = %request.model,
        turns = request.messages.len(),
        "Starting chat completion stream"
    );

    let send = client
        .post(&url)
        .bearer_auth(&api_key)
        .header("Accept", "text/event-stream")
        .json(&request)
        .send();
    let response = timeout(read_timeout, send)
        .await
        .map_err(|_| StreamError::Timeout(read_timeout))?
        .map_err(|err| {
            if err.is_timeout() {
                StreamError::Timeout(read_timeout)
            } else {
                StreamError::Connect(err)
            }
        })?;

    let status = response.status();
    debug!(stream_id, status = status.as_u16(), "Received response headers");
    if !status.is_success() {
        let body = timeout(read_timeout, response.text())
            .await
            .ok()
            .and_then(Result::ok)
            .unwrap_or_default();
        return Err(StreamError::Status {
            code: status.as_u16(),
            detail: summarize_api_error(&body),
        });
    }

    let mut stream = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();

    loop {
        let next = timeout(read_timeout, stream.next())
            .await
            .map_err(|_| StreamError::Timeout(read_timeout))?;
        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk.map_err(StreamError::Read)?;
        buffer.extend_from_slice(&chunk);

        while let Some(newline_pos) = memchr(b'\n', &buffer) {
            let line: Vec<u8> = buffer.drain(..=newline_pos).collect();
            if process_sse_bytes(&line[..newline_pos], sink, stream_id)? {
                return Ok(());
            }
        }
        if sink.is_closed() {
            return Ok(());
        }
    }

    // A final line without a trailing newline.
    if !buffer.is_empty() {
        process_sse_bytes(&buffer, sink, stream_id)?;
    }

    debug!(stream_id, "Stream closed without end marker");
    Ok(())
}

fn process_sse_bytes(line: &[u8], sink: &EventSink, stream_id: u64) -> Result<bool, StreamError> {
    match std::str::from_utf8(line) {
        Ok(line) => process_sse_line(line.trim(), sink, stream_id),
        Err(err) => {
            warn!(stream_id, error = %err, "Skipping invalid UTF-8 line in stream");
            Ok(false)
        }
    }
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

/// Handles one SSE line. Returns `Ok(true)` once the end marker is seen.
fn process_sse_line(line: &str, sink: &EventSink, stream_id: u64) -> Result<bool, StreamError> {
    let Some(payload) = extract_data_payload(line) else {
        return Ok(false);
    };
    if payload == DONE_MARKER {
        return Ok(true);
    }
    if payload.is_empty() {
        return Ok(false);
    }

    match serde_json::from_str::<ChatResponse>(payload) {
        Ok(response) => {
            if let Some(error) = &response.error {
                let summary = extract_error_summary(&serde_json::json!({ "error": error }))
                    .unwrap_or_else(|| collapse_and_truncate(&error.to_string()));
                return Err(StreamError::Api(summary));
            }
            if let Some(content) = response.first_delta() {
                sink.stream(stream_id, StreamMessage::Chunk(content.to_string()));
            }
            Ok(false)
        }
        Err(err) => {
            debug!(stream_id, error = %err, "Skipping malformed stream frame");
            Ok(false)
        }
    }
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary
        .map(|text| collapse_and_truncate(&text))
        .filter(|text| !text.is_empty())
}

fn collapse_and_truncate(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_ERROR_DETAIL_CHARS {
        return collapsed;
    }
    let mut truncated: String = collapsed.chars().take(MAX_ERROR_DETAIL_CHARS).collect();
    truncated.push('…');
    truncated
}

/// One-line description of an error response body, if it has any content.
fn summarize_api_error(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&value) {
            return Some(summary);
        }
    }
    Some(collapse_and_truncate(trimmed))
}
