//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for header names
//! that cannot appear on the wire and for duplicate entries. All problems
//! are collected and returned together.

use std::collections::HashSet;

use axum::http::HeaderName;

use super::model::Config;
use crate::error::ValidationError;

/// Validate a single header name. Returns `Ok(())` or a human-readable error.
pub fn validate_header_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("header name cannot be empty".into());
    }
    HeaderName::from_bytes(name.as_bytes())
        .map(|_| ())
        .map_err(|_| format!("'{name}' is not a valid HTTP header name"))
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, name) in config.access_control_allow_headers.iter().enumerate() {
        let field = format!("Access-Control-Allow-Headers[{i}]");

        if let Err(msg) = validate_header_name(name) {
            let trimmed = name.trim();
            errors.push(ValidationError {
                field: field.clone(),
                message: msg,
                suggestion: if trimmed != name && validate_header_name(trimmed).is_ok() {
                    Some(format!("did you mean '{trimmed}'?"))
                } else {
                    None
                },
            });
            continue;
        }

        if !seen.insert(name.to_ascii_lowercase()) {
            errors.push(ValidationError {
                field,
                message: format!("duplicate header '{name}'"),
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
