//! Rendering of [`RawMessage`]s into wire-like text blocks.
//!
//! ```text
//! METHOD PATH PROTO\r\n          (request)
//! PROTO STATUS\r\n               (response)
//! Name: value\r\n                one line per value, names sorted
//! \r\n
//! body\r\n
//! ```
//!
//! Header names are sorted so output does not depend on arrival order.
//! Values under one name keep their order. The body is copied byte for
//! byte with no escaping, so binary bodies land in the log as-is.

use axum::http::HeaderMap;

use crate::recording::message::{RawMessage, StartLine};

/// Render a message to the bytes written to the exchange log.
pub fn render(msg: &RawMessage) -> Vec<u8> {
    let mut out = Vec::with_capacity(128 + msg.body().len());

    match msg.start_line() {
        StartLine::Request { method, path } => {
            push_line(&mut out, &[method.as_str().as_bytes(), b" ", path.as_bytes(), b" ", msg.proto().as_bytes()]);
        }
        StartLine::Response { status } => {
            push_line(&mut out, &[msg.proto().as_bytes(), b" ", status.as_bytes()]);
        }
    }

    render_headers(&mut out, msg.headers());

    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(msg.body());
    out.extend_from_slice(b"\r\n");
    out
}

fn render_headers(out: &mut Vec<u8>, headers: &HeaderMap) {
    let mut names: Vec<_> = headers
        .keys()
        .map(|name| (canonical_header_name(name.as_str()), name))
        .collect();
    names.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    for (display, name) in names {
        for value in headers.get_all(name) {
            push_line(out, &[display.as_bytes(), b": ", value.as_bytes()]);
        }
    }
}

fn push_line(out: &mut Vec<u8>, parts: &[&[u8]]) {
    for part in parts {
        out.extend_from_slice(part);
    }
    out.extend_from_slice(b"\r\n");
}

/// MIME canonical form: `content-type` becomes `Content-Type`.
///
/// The HTTP stack lowercases names on receipt; this restores the form
/// clients conventionally send.
pub fn canonical_header_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let mapped = if upper { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() };
            upper = c == '-';
            mapped
        })
        .collect()
}
