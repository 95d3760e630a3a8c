//! `cors-relay validate`: check a configuration file for errors.
//!
//! Reports the configured allow-list together with the effective list the
//! CORS layer would send (base headers first), or every problem found.

use std::fmt::Write;
use std::path::Path;

use serde::Serialize;

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::model::Config;
use crate::config::{parse_config_str, validation};
use crate::cors;
use crate::error::{RelayError, ValidationError};

#[derive(Debug, Serialize)]
pub struct Report {
    pub config: String,
    pub valid: bool,
    pub configured: Vec<String>,
    /// Header names `Access-Control-Allow-Headers` carries at runtime.
    pub effective: Vec<String>,
    pub errors: Vec<ReportedError>,
}

#[derive(Debug, Serialize)]
pub struct ReportedError {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<&ValidationError> for ReportedError {
    fn from(e: &ValidationError) -> Self {
        Self {
            field: e.field.clone(),
            message: e.message.clone(),
            suggestion: e.suggestion.clone(),
        }
    }
}

impl Report {
    #[must_use]
    pub fn build(path: &Path, config: &Config, errors: &[ValidationError]) -> Self {
        let effective = if errors.is_empty() {
            cors::allow_list(config.access_control_allow_headers.iter().map(String::as_str))
                .map(|names| names.iter().map(ToString::to_string).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        Self {
            config: path.display().to_string(),
            valid: errors.is_empty(),
            configured: config.access_control_allow_headers.clone(),
            effective,
            errors: errors.iter().map(ReportedError::from).collect(),
        }
    }

    fn render_text(&self) -> String {
        if !self.valid {
            let mut out = format!("\u{2717} {} has {} errors\n", self.config, self.errors.len());
            for e in &self.errors {
                let _ = write!(out, "\n  {}: {}", e.field, e.message);
                if let Some(ref suggestion) = e.suggestion {
                    let _ = write!(out, " ({suggestion})");
                }
            }
            return out;
        }
        let base = cors::BASE_ALLOW_HEADERS.len();
        let mut out = format!(
            "\u{2713} {} is valid\n\n  Access-Control-Allow-Headers ({} base + {} configured):",
            self.config,
            base,
            self.effective.len().saturating_sub(base),
        );
        for (i, name) in self.effective.iter().enumerate() {
            let origin = if i < base { "base" } else { "config" };
            let _ = write!(out, "\n    {name:<24} {origin}");
        }
        out
    }
}

pub fn execute(args: &ValidateArgs) -> Result<(), RelayError> {
    let path = &args.config;
    if !path.exists() {
        return Err(RelayError::ConfigFileNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path)?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    let errors = validation::validate(&config).err().unwrap_or_default();
    let report = Report::build(path, &config, &errors);

    match args.format {
        ValidateFormat::Text if report.valid => println!("{}", report.render_text()),
        ValidateFormat::Text => eprintln!("{}", report.render_text()),
        ValidateFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(|e| RelayError::Io(std::io::Error::other(e)))?
        ),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(RelayError::ConfigValidation { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(headers: &[&str]) -> Config {
        Config {
            access_control_allow_headers: headers.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn effective_list_starts_with_base_headers() {
        let config = config_with(&["X-Request-Id", "content-type"]);
        let report = Report::build(Path::new("config.json"), &config, &[]);

        assert!(report.valid);
        assert_eq!(report.configured, vec!["X-Request-Id", "content-type"]);
        assert_eq!(
            report.effective,
            vec!["accept", "authorization", "content-type", "if-none-match", "x-request-id"]
        );
    }

    #[test]
    fn invalid_config_reports_errors_without_effective_list() {
        let config = config_with(&["bad header"]);
        let errors = validation::validate(&config).unwrap_err();
        let report = Report::build(Path::new("config.json"), &config, &errors);

        assert!(!report.valid);
        assert!(report.effective.is_empty());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["errors"][0]["field"], "Access-Control-Allow-Headers[0]");
        assert!(json["errors"][0].get("suggestion").is_none());
    }

    #[test]
    fn text_report_marks_header_origin() {
        let config = config_with(&["x-slce-api-token"]);
        let text = Report::build(Path::new("config.json"), &config, &[]).render_text();

        assert!(text.contains("4 base + 1 configured"));
        assert!(text.lines().any(|l| l.contains("x-slce-api-token") && l.ends_with("config")));
        assert!(text.lines().any(|l| l.contains("accept") && l.ends_with("base")));
    }
}
