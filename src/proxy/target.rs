//! Target URL resolution from the inbound query string.
//!
//! The query is decoded once, as `application/x-www-form-urlencoded`, into
//! ordered pairs. The first `url` pair is the target; every other pair is
//! re-joined as `key=value` and appended with `&`, in the order received.

use url::form_urlencoded;

use crate::error::ForwardError;

pub const URL_PARAM: &str = "url";

/// Decoded query parameters in arrival order. Duplicate keys are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw.map_or_else(Vec::new, |q| {
            form_urlencoded::parse(q.as_bytes()).into_owned().collect()
        });
        Self(pairs)
    }

    /// First value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Build the outbound URI string.
///
/// The suffix is always joined with `&`, never `?`: callers are expected to
/// pass a `url` that already carries a query.
pub fn resolve_target(params: &QueryParams) -> Result<String, ForwardError> {
    let url = match params.get(URL_PARAM) {
        Some(url) if !url.is_empty() => url,
        _ => return Err(ForwardError::MissingTargetUrl),
    };

    let rest: Vec<String> = params
        .iter()
        .filter(|(k, _)| *k != URL_PARAM)
        .map(|(k, v)| format!("{k}={v}"))
        .collect();

    if rest.is_empty() {
        Ok(url.to_string())
    } else {
        Ok(format!("{url}&{}", rest.join("&")))
    }
}
