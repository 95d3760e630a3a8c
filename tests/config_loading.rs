//! Integration tests for config loading across all file formats.

use std::path::Path;

use cors_relay::config::model::{Config, DEFAULT_ALLOW_HEADER};
use cors_relay::config::validation::validate;
use cors_relay::config::{load, load_file, parse_config_str};
use cors_relay::error::RelayError;

fn load_example(name: &str) -> String {
    let path = format!("example/{name}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

#[cfg(feature = "json")]
#[test]
fn json_example_loads_and_validates() {
    let content = load_example("config.json");
    let config = parse_config_str("json", &content, "config.json").unwrap();
    validate(&config).unwrap();
    assert_eq!(
        config.access_control_allow_headers,
        vec!["x-slce-api-token", "x-request-id"]
    );
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_example_loads_and_validates() {
    let content = load_example("cors-relay.yaml");
    let config = parse_config_str("yaml", &content, "cors-relay.yaml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.access_control_allow_headers.len(), 2);
}

#[cfg(feature = "toml")]
#[test]
fn toml_example_loads_and_validates() {
    let content = load_example("cors-relay.toml");
    let config = parse_config_str("toml", &content, "cors-relay.toml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.access_control_allow_headers.len(), 2);
}

#[cfg(all(feature = "json", feature = "yaml", feature = "toml"))]
#[test]
fn all_formats_produce_equivalent_configs() {
    let json = parse_config_str("json", &load_example("config.json"), "json").unwrap();
    let yaml = parse_config_str("yaml", &load_example("cors-relay.yaml"), "yaml").unwrap();
    let toml = parse_config_str("toml", &load_example("cors-relay.toml"), "toml").unwrap();
    assert_eq!(json, yaml);
    assert_eq!(json, toml);
}

#[test]
fn unsupported_format_returns_error() {
    let result = parse_config_str("xml", "{}", "test.xml");
    assert!(matches!(result, Err(RelayError::UnsupportedFormat(_))));
}

#[test]
fn missing_key_falls_back_to_default_token() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.access_control_allow_headers, vec![DEFAULT_ALLOW_HEADER]);
}

#[cfg(feature = "json")]
#[tokio::test]
async fn load_file_rejects_invalid_headers() {
    let path = std::env::temp_dir().join(format!("cors-relay-invalid-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"Access-Control-Allow-Headers": ["ok", "not ok"]}"#).unwrap();

    let err = load_file(&path).await.unwrap_err();
    std::fs::remove_file(&path).unwrap();

    let errors = match err {
        RelayError::ConfigValidation { errors } => errors,
        other => panic!("expected validation error, got {other}"),
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "Access-Control-Allow-Headers[1]");
}

#[cfg(feature = "json")]
#[tokio::test]
async fn explicit_path_is_loaded() {
    let (config, path) = load(Some(Path::new("example/config.json"))).await.unwrap();
    assert_eq!(path.as_deref(), Some(Path::new("example/config.json")));
    assert!(config
        .access_control_allow_headers
        .iter()
        .any(|h| h == "x-request-id"));
}
