//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, init, validate), and their argument structs. Every
//! `run` flag has an environment variable equivalent for container
//! deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "cors-relay",
    version,
    about = "HTTP forwarding proxy with permissive CORS headers",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        cors-relay run                       Listen on :8080\n  \
        cors-relay init                      Create a starter config.json\n  \
        curl 'localhost:8080/?url=https%3A%2F%2Fapi.example.com%2Fitems'"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Run(Box<RunArgs>),

    /// Generate a starter config file
    Init(InitArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        cors-relay run                                  Auto-detect ./config.json\n  \
        cors-relay run -c config.json -p 3000 --pretty  Local dev mode\n  \
        cors-relay run --allow-header x-api-key         Extra CORS header")]
pub struct RunArgs {
    /// Config file path (.json, .yaml, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Additional header allowed in cross-origin requests (repeatable)
    #[arg(long = "allow-header", env = "CORS_ALLOW_HEADERS", value_delimiter = ',')]
    pub allow_headers: Vec<String>,

    /// HTML file served for bare GET requests instead of the built-in page
    #[arg(long, env = "LANDING_PAGE")]
    pub landing_page: Option<PathBuf>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        cors-relay init                          config.json\n  \
        cors-relay init -f toml -o relay.toml    TOML format")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "config.json")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Default file name written by `init`.
    #[must_use]
    pub const fn default_file_name(&self) -> &'static str {
        match self {
            Self::Json => "config.json",
            Self::Yaml => "cors-relay.yaml",
            Self::Toml => "cors-relay.toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
