//! Response-path cross-origin headers.
//!
//! Any origin may call the relay. The allowed request headers are a fixed
//! base list followed by the configured extras. Only real preflights
//! (`OPTIONS` carrying both `Origin` and `Access-Control-Request-Method`) are
//! answered by the layer; every other `OPTIONS` is relayed like any method.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;
use tower_http::cors::{AllowMethods, Any, CorsLayer};

use crate::config::validation::validate_header_name;
use crate::error::{RelayError, ValidationError};

pub const BASE_ALLOW_HEADERS: [HeaderName; 4] = [
    header::ACCEPT,
    header::AUTHORIZATION,
    header::CONTENT_TYPE,
    header::IF_NONE_MATCH,
];

pub const EXPOSE_HEADERS: [&str; 2] = ["www-authenticate", "server-authorization"];

pub const MAX_AGE: Duration = Duration::from_secs(86_400);

/// Merge the base list with `extra`, dropping case-insensitive duplicates.
pub fn allow_list<'a>(
    extra: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<HeaderName>, RelayError> {
    let mut names: Vec<HeaderName> = BASE_ALLOW_HEADERS.to_vec();
    let mut errors = Vec::new();

    for raw in extra {
        let raw = raw.trim();
        if let Err(message) = validate_header_name(raw) {
            errors.push(ValidationError {
                field: "allow-header".into(),
                message,
                suggestion: None,
            });
            continue;
        }
        // from_bytes lowercases, so equality is case-insensitive
        if let Ok(name) = HeaderName::from_bytes(raw.as_bytes()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    if errors.is_empty() {
        Ok(names)
    } else {
        Err(RelayError::ConfigValidation { errors })
    }
}

#[must_use]
pub fn cors_layer(allow_headers: Vec<HeaderName>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(allow_headers)
        .expose_headers(EXPOSE_HEADERS.map(HeaderName::from_static))
        .max_age(MAX_AGE)
        .allow_credentials(false)
}

#[must_use]
pub fn is_preflight(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// Response headers for requests that bypass [`cors_layer`].
pub async fn allow_any_origin(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("www-authenticate,server-authorization"),
    );
    response
}

/// Send non-preflight `OPTIONS` to `passthrough` so the CORS layer, which
/// short-circuits every `OPTIONS`, only sees real preflights.
pub async fn route_options(
    State(passthrough): State<Router>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS && !is_preflight(request.method(), request.headers()) {
        let result: Result<Response, Infallible> = passthrough.oneshot(request).await;
        return match result {
            Ok(response) => response,
            Err(never) => match never {},
        };
    }
    next.run(request).await
}
