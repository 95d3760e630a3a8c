//! Error types for cors-relay.
//!
//! [`RelayError`] covers startup and config failures; these are fatal and
//! end the process. [`ForwardError`] is the per-request outcome of a failed
//! forward and is always turned into an HTTP response, never propagated.
//! [`ValidationError`] describes a single config validation problem.

use std::path::PathBuf;

use hyper::StatusCode;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RelayError {
    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Landing page not readable: {}: {source}", path.display())]
    LandingPage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("Failed to start listener on {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Why a single forward did not produce a success response.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("missing param url")]
    MissingTargetUrl,

    /// Upstream answered, but not with a success status.
    #[error("upstream responded {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    /// No status is available: bad URI, DNS, refused connection, broken body.
    #[error("transport failure: {source}")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ForwardError {
    pub fn transport(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport {
            source: source.into(),
        }
    }

    /// Status written to the response and the access log.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingTargetUrl => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
