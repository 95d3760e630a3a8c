//! One-line access log written to stdout for every handled request.
//!
//! Format: `YYYY-MM-DD H:mm:ss | METHOD | STATUS | URL`, local time. The
//! hour is not zero-padded. Requests without a target print `-` as the URL.

use std::fmt;
use std::io::Write;

use chrono::{DateTime, Local, TimeZone};
use hyper::StatusCode;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %-H:%M:%S";

pub struct AccessLogEntry<'a, Tz: TimeZone> {
    pub at: DateTime<Tz>,
    pub method: &'a str,
    pub status: StatusCode,
    pub target: Option<&'a str>,
}

impl<Tz: TimeZone> fmt::Display for AccessLogEntry<'_, Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {}",
            self.at.format(TIMESTAMP_FORMAT),
            self.method,
            self.status.as_u16(),
            self.target.unwrap_or("-"),
        )
    }
}

/// Write the access line for a finished request.
pub fn record(method: &str, status: StatusCode, target: Option<&str>) {
    let entry = AccessLogEntry {
        at: Local::now(),
        method,
        status,
        target,
    };

    tracing::debug!(
        method = %method,
        status = status.as_u16(),
        target = target.unwrap_or("-"),
        "request handled"
    );

    let mut out = std::io::stdout().lock();
    if let Err(e) = writeln!(out, "{entry}") {
        tracing::warn!(error = %e, "failed to write access log");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, h, m, s).unwrap()
    }

    #[test]
    fn formats_fixed_layout() {
        let entry = AccessLogEntry {
            at: at(14, 5, 9),
            method: "GET",
            status: StatusCode::OK,
            target: Some("http://example.com/api?foo=bar"),
        };
        assert_eq!(
            entry.to_string(),
            "2024-03-07 14:05:09 | GET | 200 | http://example.com/api?foo=bar"
        );
    }

    #[test]
    fn hour_is_not_padded() {
        let entry = AccessLogEntry {
            at: at(7, 0, 0),
            method: "POST",
            status: StatusCode::NOT_FOUND,
            target: Some("http://x"),
        };
        assert!(entry.to_string().starts_with("2024-03-07 7:00:00 | POST | 404"));
    }

    #[test]
    fn missing_target_prints_dash() {
        let entry = AccessLogEntry {
            at: at(23, 59, 59),
            method: "DELETE",
            status: StatusCode::BAD_REQUEST,
            target: None,
        };
        assert!(entry.to_string().ends_with("| DELETE | 400 | -"));
    }
}
