//! Configuration loading and validation.
//!
//! The config file is optional: [`load`] auto-detects `config.json` or
//! `cors-relay.{yaml,yml,toml}` in the working directory and falls back to
//! [`Config::default`](model::Config) when nothing is found. The format is
//! chosen by file extension via [`parse_config_str`].

pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::RelayError;
use model::Config;

/// Files probed, in order, when no path is given.
pub const CANDIDATES: &[&str] = &[
    "config.json",
    "cors-relay.yaml",
    "cors-relay.yml",
    "cors-relay.toml",
];

/// Parse a config string based on file extension.
pub fn parse_config_str(ext: &str, content: &str, path_display: &str) -> Result<Config, RelayError> {
    match ext {
        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| RelayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| RelayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| RelayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(RelayError::UnsupportedFormat(other.to_string())),
    }
}

/// Read, parse, and validate a config file.
pub async fn load_file(path: &Path) -> Result<Config, RelayError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RelayError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RelayError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&config) {
        return Err(RelayError::ConfigValidation { errors });
    }
    Ok(config)
}

/// Load the explicit file if given, else the first existing candidate,
/// else the defaults. Returns the path that was used, if any.
pub async fn load(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>), RelayError> {
    if let Some(path) = explicit {
        return load_file(path)
            .await
            .map(|config| (config, Some(path.to_path_buf())));
    }

    for name in CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            let config = load_file(&path).await?;
            return Ok((config, Some(path)));
        }
    }

    Ok((Config::default(), None))
}
