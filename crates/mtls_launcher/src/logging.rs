//! Console and rolling-file logging.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

pub const LOG_DIR: &str = "logs";
pub const LOG_FILE: &str = "mtls_launcher.log";

/// `RUST_LOG`-style directives, falling back to `default` when there are none.
pub fn filter(default: LevelFilter, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .parse_lossy(directives.unwrap_or_default())
}

/// Install the global subscriber. Keep the guard alive until exit, dropping
/// it flushes the file writer.
pub fn init() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(LOG_DIR, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let directives = std::env::var("RUST_LOG").ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                // Quiet by default so prompts remain readable
                .with_filter(filter(LevelFilter::WARN, directives.as_deref())),
        ) // Stderr
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(filter(LevelFilter::INFO, directives.as_deref())),
        ) // File
        .init();

    guard
}
