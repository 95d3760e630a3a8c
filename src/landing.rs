//! Landing page served for `GET /` without a `url` parameter.

use std::path::Path;

use bytes::Bytes;

use crate::error::RelayError;

pub const BUILTIN: &str = include_str!("../static/index.html");

/// The page to serve: `path` when given, else the built-in page. Read once
/// at startup.
pub async fn load(path: Option<&Path>) -> Result<Bytes, RelayError> {
    let Some(path) = path else {
        return Ok(Bytes::from_static(BUILTIN.as_bytes()));
    };
    tokio::fs::read(path)
        .await
        .map(Bytes::from)
        .map_err(|source| RelayError::LandingPage {
            path: path.to_path_buf(),
            source,
        })
}
