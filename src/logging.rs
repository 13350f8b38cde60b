//! Tracing setup for the CLI.
//!
//! `JSON_UNION_LOG` (falling back to `RUST_LOG`) takes an `EnvFilter`
//! directive such as `debug` or `json_union::union=trace`.
//! `JSON_UNION_LOG_FORMAT=json` switches to one JSON object per event.
//!
//! Nothing is installed unless one of the two filter variables is set.

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("JSON_UNION_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

fn build_filter() -> EnvFilter {
    match std::env::var("JSON_UNION_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Installs the global subscriber; output goes to stderr so stdout stays JSON.
pub fn init_tracing() {
    if std::env::var("JSON_UNION_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr);

    match LogFormat::from_env() {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
