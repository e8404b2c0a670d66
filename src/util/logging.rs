use std::path::Path;

use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter when set. With `log_dir` the
/// output additionally goes to a daily-rolling file in that directory.
pub fn init_logging(log_dir: Option<&Path>, verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "beatmatch=debug,warn"
    } else {
        "beatmatch=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);

    match log_dir {
        Some(dir) => {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "beatmatch.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The writer stops flushing once the guard drops; init_logging
            // runs once per process, so leak it.
            std::mem::forget(guard);

            registry
                .with(fmt::layer().with_target(true))
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
        }
        None => registry.with(fmt::layer().with_target(true)).init(),
    }

    Ok(())
}
