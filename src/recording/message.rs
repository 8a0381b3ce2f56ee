//! Logged representation of HTTP messages.
//!
//! A [`RawMessage`] is captured at the moment a request is built or a
//! response is received, then moved into a [`LogEntry`] and never mutated.

use std::time::Instant;

use axum::http::{HeaderMap, Method, StatusCode, Version};
use bytes::Bytes;
use chrono::{DateTime, Local};
use uuid::Uuid;

/// Identifies the request/response pair an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExchangeId(Uuid);

impl ExchangeId {
    /// Generate a new random exchange ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The start line of a message; exactly one shape applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartLine {
    Request { method: Method, path: String },
    Response { status: String },
}

/// Immutable snapshot of one HTTP request or response.
#[derive(Debug, Clone)]
pub struct RawMessage {
    start: StartLine,
    proto: String,
    headers: HeaderMap,
    body: Bytes,
}

impl RawMessage {
    /// Capture an outbound request. `path` is recorded verbatim.
    pub fn request(
        method: Method,
        path: impl Into<String>,
        version: Version,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        Self {
            start: StartLine::Request {
                method,
                path: path.into(),
            },
            proto: proto_name(version),
            headers,
            body,
        }
    }

    /// Capture a received response. `reason` is the phrase the server sent
    /// when it differs from the canonical one.
    pub fn response(
        version: Version,
        status: StatusCode,
        reason: Option<&str>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        Self {
            start: StartLine::Response {
                status: status_text(status, reason),
            },
            proto: proto_name(version),
            headers,
            body,
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(self.start, StartLine::Request { .. })
    }

    pub fn start_line(&self) -> &StartLine {
        &self.start
    }

    pub fn proto(&self) -> &str {
        &self.proto
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// `HTTP/1.1`, `HTTP/2.0`, ...
fn proto_name(version: Version) -> String {
    format!("{version:?}")
}

/// `200 OK`; codes without any reason phrase are rendered alone.
fn status_text(status: StatusCode, reason: Option<&str>) -> String {
    match reason.or(status.canonical_reason()).filter(|r| !r.is_empty()) {
        Some(reason) => format!("{} {}", status.as_str(), reason),
        None => status.as_str().to_string(),
    }
}

/// A message on its way to the logging agent.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Wall-clock time, used for the separator line.
    pub timestamp: DateTime<Local>,
    /// Monotonic time, used for elapsed-time computation.
    pub instant: Instant,
    pub exchange: ExchangeId,
    pub message: RawMessage,
}

impl LogEntry {
    /// Stamp a message with the current time.
    pub fn now(exchange: ExchangeId, message: RawMessage) -> Self {
        Self {
            timestamp: Local::now(),
            instant: Instant::now(),
            exchange,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn request_captures_fields_verbatim() {
        let mut headers = HeaderMap::new();
        headers.append("x-multi", HeaderValue::from_static("b"));
        headers.append("x-multi", HeaderValue::from_static("a"));

        let msg = RawMessage::request(
            Method::POST,
            "/a%20b",
            Version::HTTP_11,
            headers,
            Bytes::from_static(b"\x00\xffbody"),
        );

        assert!(msg.is_request());
        assert_eq!(
            msg.start_line(),
            &StartLine::Request { method: Method::POST, path: "/a%20b".into() }
        );
        assert_eq!(msg.proto(), "HTTP/1.1");
        let values: Vec<&str> = msg
            .headers()
            .get_all("x-multi")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values, vec!["b", "a"]);
        assert_eq!(msg.body(), b"\x00\xffbody");
    }

    #[test]
    fn response_status_includes_reason() {
        let msg = RawMessage::response(
            Version::HTTP_2,
            StatusCode::NOT_FOUND,
            None,
            HeaderMap::new(),
            Bytes::new(),
        );

        assert!(!msg.is_request());
        assert_eq!(msg.proto(), "HTTP/2.0");
        assert_eq!(msg.start_line(), &StartLine::Response { status: "404 Not Found".into() });
    }

    #[test]
    fn unknown_status_has_no_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(status_text(status, None), "599");
    }

    #[test]
    fn received_reason_phrase_wins() {
        assert_eq!(status_text(StatusCode::OK, Some("All Good")), "200 All Good");
        assert_eq!(status_text(StatusCode::OK, Some("")), "200");
    }

    #[test]
    fn exchange_ids_are_unique() {
        assert_ne!(ExchangeId::new(), ExchangeId::new());
    }
}
