// Diagnostics go to stderr through tracing; stdout belongs to the menu.

use std::io;

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("logging already initialized")]
    AlreadyInitialized,
    #[error("invalid RUST_LOG directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::FromEnvError),
}

#[derive(Clone, Copy, Debug)]
pub struct LogOptions {
    pub debug: bool,
    pub use_color: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            debug: false,
            use_color: true,
        }
    }
}

impl LogOptions {
    fn default_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        }
    }

    /// `RUST_LOG` if set, otherwise info (debug with `--debug`)
    fn filter(&self) -> Result<EnvFilter, LogError> {
        Ok(EnvFilter::builder()
            .with_default_directive(self.default_level().into())
            .from_env()?)
    }
}

pub fn init(options: LogOptions) -> Result<(), LogError> {
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(options.use_color)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(options.filter()?)
        .with(console_layer)
        .try_init()
        .map_err(|_| LogError::AlreadyInitialized)
}
