use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::CaptionError;

pub const DEFAULT_LOG_FILE: &str = "app.log";
const DEFAULT_FILTER: &str = "caption_maker=info,tower_http=info";

/// Log to stderr and append the same events to `log_file`.
///
/// Call after `.env` is loaded so a `RUST_LOG` set there is honored.
pub fn init_tracing(log_file: impl AsRef<Path>) -> Result<(), CaptionError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file.as_ref())?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_ansi(true))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| CaptionError::Config(format!("logging already initialised: {}", e)))
}
