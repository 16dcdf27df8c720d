//! Tracing setup shared by the server binary and tests.
//!
//! One compact fmt layer for every crate in the process, RFC3339 UTC
//! timestamps via `chrono`, and an `EnvFilter` read from `RUST_LOG` with a
//! fallback default plus per-crate directives for the workspace libraries.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt};

/// Library targets that get their own level directive.
pub const WORKSPACE_TARGETS: [&str; 3] = ["embedding_service", "passage_store", "api"];

/// RFC3339 UTC timer, e.g. `2025-09-12T10:20:30Z`.
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Compact single-line fmt layer.
///
/// ANSI colors only when stdout is a terminal; span close events are logged so
/// `#[instrument]`ed calls report their duration.
pub fn fmt_layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_ansi(io::stdout().is_terminal())
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .compact()
}

/// Level directive for one target, e.g. `passage_store=debug`.
pub fn level_directive(target: &str, level: Level) -> Result<Directive, ParseError> {
    Directive::from_str(&format!("{target}={}", level.as_str().to_lowercase()))
}

/// `RUST_LOG` if set, otherwise `default`; workspace libraries are raised to
/// `level` only when `RUST_LOG` is unset.
pub fn env_filter(default: &str, level: Level) -> Result<EnvFilter, ParseError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let mut filter = EnvFilter::try_new(default)?;
    for target in WORKSPACE_TARGETS {
        filter = filter.add_directive(level_directive(target, level)?);
    }
    Ok(filter)
}

/// Errors from [`init`].
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
    #[error("global subscriber already set: {0}")]
    Init(#[from] TryInitError),
}

/// Installs the global subscriber.
pub fn init(default: &str, level: Level) -> Result<(), TelemetryError> {
    tracing_subscriber::registry()
        .with(env_filter(default, level)?)
        .with(fmt_layer())
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_targets_one_crate() {
        let d = level_directive("passage_store", Level::DEBUG).expect("directive");
        assert_eq!(d.to_string(), "passage_store=debug");
    }
}
