//! Structured logging setup for the server binary.

use tracing_subscriber::EnvFilter;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable text.
    Text,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Interpret a `LOG_FORMAT` value. Anything but `json` is text.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Install the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from `LOG_LEVEL`
/// (default `info`). `LOG_FORMAT=json` selects JSON output.
pub fn init_tracing() {
    let fallback_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| String::from("info"));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_level));
    let format = std::env::var("LOG_FORMAT").map_or(LogFormat::Text, |raw| LogFormat::parse(&raw));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
