//! `cors-relay run`: start the proxy server.
//!
//! Loads the optional config file, freezes it together with the CLI values
//! into the shared [`AppState`] and CORS allow-list, then serves until
//! SIGTERM / Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config;
use crate::cors;
use crate::error::RelayError;
use crate::landing;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), RelayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let (config, config_path) = config::load(args.config.as_deref()).await?;

    let allow_headers = cors::allow_list(
        config
            .access_control_allow_headers
            .iter()
            .chain(&args.allow_headers)
            .map(String::as_str),
    )?;

    let state = Arc::new(AppState {
        http_client: server::build_http_client(),
        landing_page: landing::load(args.landing_page.as_deref()).await?,
    });

    let header_count = allow_headers.len();
    let router = server::build_router(state, allow_headers, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| {
            tracing::error!(addr = %addr, error = %source, "failed to bind listener");
            RelayError::Bind { addr, source }
        })?;

    tracing::info!(
        addr = %addr,
        config = %config_path.as_ref().map_or_else(|| "(defaults)".to_string(), |p| p.display().to_string()),
        allow_headers = header_count,
        "cors-relay started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("cors-relay stopped");
    Ok(())
}
