use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the level chosen by `verbose`. Logs go to
/// stderr so that JSON written to stdout or a file stays clean.
pub fn init_logger(json: bool, verbose: bool) -> Result<()> {
    let log_level = if verbose { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into());
    if json {
        let subscriber = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .with_target(true);
        tracing_subscriber::registry().with(subscriber).with(env_filter).try_init()?;
    } else {
        let subscriber = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_thread_names(true)
            .with_thread_ids(true);
        tracing_subscriber::registry().with(subscriber).with(env_filter).try_init()?;
    }

    Ok(())
}
