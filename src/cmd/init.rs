//! `cors-relay init`: generate a starter configuration file.
//!
//! Serializes the default [`Config`] in the chosen format. Refuses to
//! overwrite an existing file.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::config::model::Config;
use crate::error::RelayError;

pub fn execute(args: &InitArgs) -> Result<(), RelayError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(args.format.default_file_name()));

    if output.exists() {
        return Err(RelayError::FileExists { path: output });
    }

    let content = serialize_config(&Config::default(), &args.format)?;
    std::fs::write(&output, content)?;
    println!("Created {}", output.display());
    Ok(())
}

/// Serialize a `Config` to a formatted string in the given format.
pub fn serialize_config(config: &Config, format: &ConfigFormat) -> Result<String, RelayError> {
    match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| RelayError::Io(std::io::Error::other(e.to_string()))),

        #[cfg(feature = "yaml")]
        ConfigFormat::Yaml => serde_yml::to_string(config)
            .map_err(|e| RelayError::Io(std::io::Error::other(e.to_string()))),

        #[cfg(not(feature = "yaml"))]
        ConfigFormat::Yaml => Err(RelayError::UnsupportedFormat("yaml".into())),

        #[cfg(feature = "toml")]
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| RelayError::Io(std::io::Error::other(e.to_string()))),

        #[cfg(not(feature = "toml"))]
        ConfigFormat::Toml => Err(RelayError::UnsupportedFormat("toml".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_template_round_trips() {
        let text = serialize_config(&Config::default(), &ConfigFormat::Json).unwrap();
        assert!(text.contains("Access-Control-Allow-Headers"));
        let parsed: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[cfg(not(feature = "toml"))]
    #[test]
    fn toml_requires_feature() {
        assert!(serialize_config(&Config::default(), &ConfigFormat::Toml).is_err());
    }

    #[test]
    fn refuses_to_overwrite() {
        let path = std::env::temp_dir().join(format!("cors-relay-init-{}.json", std::process::id()));
        std::fs::write(&path, "{}").unwrap();
        let args = InitArgs {
            format: ConfigFormat::Json,
            output: Some(path.clone()),
        };
        let err = execute(&args).unwrap_err();
        assert!(matches!(err, RelayError::FileExists { .. }));
        std::fs::remove_file(&path).unwrap();
    }
}
