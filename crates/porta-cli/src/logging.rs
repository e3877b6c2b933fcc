//! Tracing subscriber setup.
//!
//! Events go to `${PORTA_HOME}/logs/porta.log` through a non-blocking writer.
//! Nothing is written to stdout or stderr, so the TUI is never corrupted.
//! The filter comes from `PORTA_LOG` (default `info`).

use porta_core::config::paths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_NAME: &str = "porta.log";
const FILTER_ENV: &str = "PORTA_LOG";

/// Installs the global subscriber. Keep the returned guard alive until exit
/// so buffered events are flushed.
pub fn init() -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let logs_dir = paths::logs_dir();
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(&logs_dir);

    match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .with(env_filter)
                .init();
            tracing::debug!(path = %logs_dir.join(LOG_FILE_NAME).display(), "logging initialized");
            Some(guard)
        }
        Err(_) => {
            // No usable log directory: drop events rather than print them.
            tracing_subscriber::registry().with(env_filter).init();
            None
        }
    }
}
