//! Outbound request construction.
//!
//! # Responsibilities
//! - Map an inbound request-target onto the forward base address
//! - Copy inbound headers for the outbound request
//! - Copy upstream headers for the relayed response
//!
//! # Design Decisions
//! - Path, query and fragment are carried over already escaped
//! - Every header is copied unmodified, hop-by-hop ones included; only
//!   `Host` is dropped, since it names this proxy rather than the target
//! - Upstream bodies are read in full before relaying, so the upstream
//!   `Transfer-Encoding` no longer describes the body and is dropped

use axum::http::{header, HeaderMap};
use url::Url;

/// Outbound URL for `target` (`/path?query#fragment`) on `base`.
pub fn forward_url(base: &Url, target: &str) -> Url {
    let (rest, fragment) = match target.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (target, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let mut url = base.clone();
    url.set_path(path);
    url.set_query(query.filter(|q| !q.is_empty()));
    url.set_fragment(fragment.filter(|f| !f.is_empty()));
    url
}

/// Headers to send upstream: all inbound values in arrival order, minus `Host`.
pub fn outbound_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if *name != header::HOST {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

/// Headers relayed (and recorded) for an upstream response: all values, minus `Transfer-Encoding`.
pub fn relayed_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = upstream.clone();
    headers.remove(header::TRANSFER_ENCODING);
    headers
}
