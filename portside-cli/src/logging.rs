///! Logging configuration module
///! Console output on stderr plus an optional rolling log file

use serde::{Deserialize, Serialize};
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

const LOG_FILE_NAME: &str = "portside.log";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory of the rolling log file
    pub file_path: Option<String>,
    pub rotation: LogRotation,
    pub json_format: bool,
}

/// Log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl LoggingConfig {
    /// `RUST_LOG` and `PORTSIDE_LOG_PATH` take precedence over the file
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("RUST_LOG") {
            self.level = level;
        }
        if let Ok(path) = std::env::var("PORTSIDE_LOG_PATH") {
            self.file_path = Some(path);
        }
        self
    }

    /// Install the global subscriber. Keep the returned guard alive until
    /// exit so buffered file output is flushed.
    pub fn init(&self) -> anyhow::Result<Option<WorkerGuard>> {
        let env_filter = EnvFilter::try_new(&self.level)?;

        let (file_layer, guard) = match &self.file_path {
            Some(path) => {
                let file_appender = match self.rotation {
                    LogRotation::Hourly => rolling::hourly(path, LOG_FILE_NAME),
                    LogRotation::Daily => rolling::daily(path, LOG_FILE_NAME),
                    LogRotation::Never => rolling::never(path, LOG_FILE_NAME),
                };
                let (writer, guard) = non_blocking(file_appender);

                let layer = fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .with_writer(writer);
                let layer: Box<dyn Layer<Registry> + Send + Sync> = if self.json_format {
                    layer.json().boxed()
                } else {
                    layer.boxed()
                };
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        let console_layer = fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_writer(io::stderr);

        tracing_subscriber::registry()
            .with(file_layer)
            .with(env_filter)
            .with(console_layer)
            .try_init()?;

        tracing::debug!(level = %self.level, file = ?self.file_path, "Logging initialized");

        Ok(guard)
    }
}
