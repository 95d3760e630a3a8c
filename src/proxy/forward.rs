//! Single outbound call per inbound request.
//!
//! [`execute`] sends the prepared request, follows redirects for `GET` and
//! `HEAD`, and interprets the terminal response: a 2xx becomes a
//! [`Payload`], anything else becomes a [`ForwardError`]. There are no
//! retries and no timeout beyond the transport defaults. Dropping the
//! returned future aborts the outbound call.

use axum::http::{header, HeaderMap, HeaderValue, Method};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::StatusCode;

use crate::error::ForwardError;
use crate::server::HttpClient;

/// Redirect hops followed before the redirect status is surfaced as-is.
pub const MAX_REDIRECTS: usize = 10;

pub struct Outbound {
    pub method: Method,
    pub target: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Body of a successful upstream response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    /// Not JSON; relayed as-is with the upstream content type.
    Text {
        content_type: Option<HeaderValue>,
        body: Bytes,
    },
    Empty,
}

impl Payload {
    #[must_use]
    pub fn from_upstream(content_type: Option<HeaderValue>, body: Bytes) -> Self {
        if body.is_empty() {
            return Self::Empty;
        }
        match serde_json::from_slice(&body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text { content_type, body },
        }
    }
}

/// Prepare the inbound payload for sending.
///
/// JSON bodies are re-serialized compactly and tagged `application/json`
/// unless a content type is already present. Other bodies pass verbatim.
pub fn encode_body(headers: &mut HeaderMap, body: Bytes) -> Option<Bytes> {
    if body.is_empty() {
        return None;
    }
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(&body) else {
        return Some(body);
    };
    match serde_json::to_vec(&value) {
        Ok(encoded) => {
            headers
                .entry(header::CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("application/json"));
            Some(Bytes::from(encoded))
        }
        Err(_) => Some(body),
    }
}

fn parse_target(target: &str) -> Result<url::Url, ForwardError> {
    let url = url::Url::parse(target).map_err(ForwardError::transport)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ForwardError::transport(format!(
            "unsupported scheme '{other}'"
        ))),
    }
}

fn follows_redirects(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

const fn is_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

fn redirect_location(headers: &HeaderMap, base: &url::Url) -> Option<url::Url> {
    let location = headers.get(header::LOCATION)?.to_str().ok()?;
    let next = base.join(location).ok()?;
    matches!(next.scheme(), "http" | "https").then_some(next)
}

/// Drop credentials when a redirect leaves the origin host and port.
fn strip_credentials_on_host_change(headers: &mut HeaderMap, from: &url::Url, to: &url::Url) {
    if from.host_str() == to.host_str() && from.port_or_known_default() == to.port_or_known_default() {
        return;
    }
    headers.remove(header::AUTHORIZATION);
    headers.remove(header::COOKIE);
    headers.remove(header::PROXY_AUTHORIZATION);
}

fn upstream_message(response: &hyper::Response<hyper::body::Incoming>) -> String {
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
        .or_else(|| response.status().canonical_reason().map(String::from))
        .unwrap_or_else(|| "Unknown".to_string())
}

pub async fn execute(client: &HttpClient, outbound: Outbound) -> Result<Payload, ForwardError> {
    let Outbound {
        method,
        target,
        mut headers,
        body,
    } = outbound;

    let mut url = parse_target(&target)?;
    let mut hops = 0;

    let response = loop {
        let mut req = hyper::Request::builder()
            .method(method.clone())
            .uri(url.as_str())
            .body(Full::new(body.clone().unwrap_or_default()))
            .map_err(ForwardError::transport)?;
        *req.headers_mut() = headers.clone();

        let response = client.request(req).await.map_err(ForwardError::transport)?;

        if hops < MAX_REDIRECTS && follows_redirects(&method) && is_redirect(response.status()) {
            if let Some(next) = redirect_location(response.headers(), &url) {
                tracing::debug!(from = %url, to = %next, status = response.status().as_u16(), "following redirect");
                strip_credentials_on_host_change(&mut headers, &url, &next);
                url = next;
                hops += 1;
                continue;
            }
        }
        break response;
    };

    let status = response.status();
    if !status.is_success() {
        return Err(ForwardError::Upstream {
            status,
            message: upstream_message(&response),
        });
    }

    let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(ForwardError::transport)?
        .to_bytes();

    Ok(Payload::from_upstream(content_type, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_is_compacted_and_tagged() {
        let mut headers = HeaderMap::new();
        let body = encode_body(&mut headers, Bytes::from_static(b"{ \"a\" : 1 }")).unwrap();
        assert_eq!(body, Bytes::from_static(b"{\"a\":1}"));
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn existing_content_type_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.api+json"),
        );
        encode_body(&mut headers, Bytes::from_static(b"[1,2]")).unwrap();
        assert_eq!(
            headers.get("content-type").unwrap(),
            "application/vnd.api+json"
        );
    }

    #[test]
    fn non_json_body_passes_verbatim() {
        let mut headers = HeaderMap::new();
        let body = encode_body(&mut headers, Bytes::from_static(b"a=1&b=2")).unwrap();
        assert_eq!(body, Bytes::from_static(b"a=1&b=2"));
        assert!(headers.get("content-type").is_none());
    }

    #[test]
    fn empty_body_is_omitted() {
        let mut headers = HeaderMap::new();
        assert!(encode_body(&mut headers, Bytes::new()).is_none());
    }

    #[test]
    fn upstream_json_is_parsed() {
        let payload = Payload::from_upstream(None, Bytes::from_static(b"{\"ok\":true}"));
        assert_eq!(payload, Payload::Json(serde_json::json!({"ok": true})));
    }

    #[test]
    fn upstream_text_is_relayed() {
        let ct = HeaderValue::from_static("text/plain");
        let payload = Payload::from_upstream(Some(ct.clone()), Bytes::from_static(b"hello"));
        assert_eq!(
            payload,
            Payload::Text {
                content_type: Some(ct),
                body: Bytes::from_static(b"hello"),
            }
        );
    }

    #[test]
    fn upstream_empty_body() {
        assert_eq!(Payload::from_upstream(None, Bytes::new()), Payload::Empty);
    }

    #[test]
    fn only_http_schemes_are_forwarded() {
        assert!(parse_target("https://example.com/api").is_ok());
        assert!(matches!(
            parse_target("ftp://example.com/file"),
            Err(ForwardError::Transport { .. })
        ));
        assert!(matches!(
            parse_target("not a url"),
            Err(ForwardError::Transport { .. })
        ));
    }

    #[test]
    fn relative_location_resolves_against_current_url() {
        let base = url::Url::parse("http://h:81/a/b?x=1").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::LOCATION, HeaderValue::from_static("/c?y=2"));
        assert_eq!(
            redirect_location(&headers, &base).unwrap().as_str(),
            "http://h:81/c?y=2"
        );
    }

    #[test]
    fn only_safe_methods_follow_redirects() {
        assert!(follows_redirects(&Method::GET));
        assert!(follows_redirects(&Method::HEAD));
        assert!(!follows_redirects(&Method::POST));
        assert!(!is_redirect(StatusCode::NOT_MODIFIED));
    }

    fn credentialed_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("session=1"));
        headers.insert(header::PROXY_AUTHORIZATION, HeaderValue::from_static("Basic eA=="));
        headers.insert("x-slce-api-token", HeaderValue::from_static("t0k3n"));
        headers
    }

    #[test]
    fn same_host_redirect_keeps_credentials() {
        let from = url::Url::parse("https://api.example/a").unwrap();
        let to = url::Url::parse("https://api.example:443/b").unwrap();
        let mut headers = credentialed_headers();
        strip_credentials_on_host_change(&mut headers, &from, &to);
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn cross_host_redirect_drops_credentials() {
        let from = url::Url::parse("https://api.example/a").unwrap();
        for to in ["https://other.example/b", "https://api.example:8443/b"] {
            let to = url::Url::parse(to).unwrap();
            let mut headers = credentialed_headers();
            strip_credentials_on_host_change(&mut headers, &from, &to);
            assert!(headers.get(header::AUTHORIZATION).is_none(), "{to}");
            assert!(headers.get(header::COOKIE).is_none(), "{to}");
            assert!(headers.get(header::PROXY_AUTHORIZATION).is_none(), "{to}");
            assert_eq!(headers["x-slce-api-token"], "t0k3n");
        }
    }
}
