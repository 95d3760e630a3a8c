//! Outbound header assembly.
//!
//! [`build_outbound_headers`] starts from the inbound headers and applies,
//! in order: hop-by-hop and `content-length` stripping, removal of inbound
//! CORS request headers, then the fixed overrides. Overrides always win:
//! `accept` is forced to `application/json`, `accept-encoding` and `host`
//! are removed so the client negotiates its own.

use std::sync::LazyLock;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

static HOP_BY_HOP: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        "connection",
        "keep-alive",
        "transfer-encoding",
        "te",
        "trailer",
        "upgrade",
        "proxy-authorization",
        "proxy-authenticate",
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

const CORS_REQUEST_PREFIX: &str = "access-control-";

pub const ACCEPT_JSON: &str = "application/json";

pub fn build_outbound_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = inbound.clone();

    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
    // The body is re-encoded before sending; the client sets its own length.
    headers.remove(header::CONTENT_LENGTH);

    let cors: Vec<HeaderName> = headers
        .keys()
        .filter(|name| name.as_str().starts_with(CORS_REQUEST_PREFIX))
        .cloned()
        .collect();
    for name in cors {
        headers.remove(name);
    }

    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
    headers.remove(header::ACCEPT_ENCODING);
    headers.remove(header::HOST);

    headers
}
