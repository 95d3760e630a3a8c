//! Serde data structures for the cors-relay configuration file.
//!
//! The file is optional. Its only setting is the list of extra request
//! headers browsers may send cross-origin, stored under the key
//! `Access-Control-Allow-Headers`.

use serde::{Deserialize, Serialize};

/// Header token accepted by default when no config list is given.
pub const DEFAULT_ALLOW_HEADER: &str = "x-slce-api-token";

fn default_allow_headers() -> Vec<String> {
    vec![DEFAULT_ALLOW_HEADER.to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Replaces the default token list when present.
    #[serde(
        rename = "Access-Control-Allow-Headers",
        alias = "allow_headers",
        default = "default_allow_headers"
    )]
    pub access_control_allow_headers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_control_allow_headers: default_allow_headers(),
        }
    }
}
