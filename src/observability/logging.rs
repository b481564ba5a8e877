//! Structured logging.
//!
//! `RUST_LOG` takes precedence over the configured level. JSON output is
//! meant for containers, pretty output for a terminal.

use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LogFormat;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level '{level}': {source}")]
    Filter {
        level: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("global subscriber already set: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Build the filter: `RUST_LOG` if set and valid, else `level`.
pub fn env_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|source| LoggingError::Filter {
        level: level.to_string(),
        source,
    })
}

/// The event formatting layer for `format`, writing to `writer`.
///
/// JSON events are flattened: fields sit at the top level next to
/// `timestamp`, `level` and `message`.
pub fn fmt_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer().with_writer(writer).boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_writer(writer)
            .boxed(),
    }
}

/// Install the global tracing subscriber, logging to stdout.
pub fn init(level: &str, format: LogFormat) -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(env_filter(level)?)
        .with(fmt_layer(format, std::io::stdout))
        .try_init()?;
    Ok(())
}
