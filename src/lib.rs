//! cors-relay is a single-route HTTP forwarding proxy.
//!
//! Any request to `/` carrying a percent-encoded `url` query parameter is
//! relayed to that URL, and the upstream JSON response is returned with
//! permissive CORS headers so browser clients can reach third-party APIs.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate).
//! - [`config`] -- Optional config file loading and validation.
//! - [`cors`] -- `tower-http` CORS layer and allow-list assembly.
//! - [`error`] -- Startup errors and per-request forward errors (`thiserror`).
//! - [`landing`] -- Static landing page for bare `GET /`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`access_log`] -- Fixed-format one-line access log on stdout.
//! - [`proxy`] -- The forwarder: target resolution, header assembly, the
//!   outbound call, and response mapping.
//! - [`server`] -- Axum router, shared state, HTTP client, graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `json` | JSON config file support _(enabled by default)_ |
//! | `yaml` | YAML config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod access_log;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod cors;
pub mod error;
pub mod landing;
pub mod logging;
pub mod proxy;
pub mod server;
