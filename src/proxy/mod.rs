//! The forwarder: the single `/` route.
//!
//! [`forward_handler`] serves the landing page for bare `GET`s, rejects
//! requests without a `url` parameter, and otherwise relays the request to
//! the resolved target. Every branch except the landing page writes one
//! access log line. Submodules handle target resolution ([`target`]),
//! header assembly ([`headers`]), the outbound call ([`forward`]), and
//! response mapping ([`response`]).

pub mod forward;
pub mod headers;
pub mod response;
pub mod target;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::access_log;
use crate::error::ForwardError;
use crate::server::AppState;

/// Upper-case the method. Unknown methods are kept and left for the
/// client to reject.
#[must_use]
pub fn normalize_method(method: &Method) -> Method {
    let upper = method.as_str().to_ascii_uppercase();
    if upper == method.as_str() {
        return method.clone();
    }
    Method::from_bytes(upper.as_bytes()).unwrap_or_else(|_| method.clone())
}

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let method = normalize_method(&method);
    let params = target::QueryParams::parse(uri.query());

    if method == Method::GET && !params.contains(target::URL_PARAM) {
        return (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            state.landing_page.clone(),
        )
            .into_response();
    }

    let target = match target::resolve_target(&params) {
        Ok(target) => target,
        Err(e) => {
            access_log::record(method.as_str(), e.status(), None);
            return response::error_response(&e, None);
        }
    };

    tracing::debug!(method = %method, target = %target, "forwarding request");

    let mut headers = headers::build_outbound_headers(&req_headers);
    let body = forward::encode_body(&mut headers, body);
    let outbound = forward::Outbound {
        method: method.clone(),
        target: target.clone(),
        headers,
        body,
    };

    match forward::execute(&state.http_client, outbound).await {
        Ok(payload) => {
            access_log::record(method.as_str(), StatusCode::OK, Some(&target));
            response::success_response(payload)
        }
        Err(e) => {
            if let ForwardError::Transport { ref source } = e {
                tracing::warn!(method = %method, target = %target, error = %source, "upstream unreachable");
            }
            access_log::record(method.as_str(), e.status(), Some(&target));
            response::error_response(&e, Some(&target))
        }
    }
}
