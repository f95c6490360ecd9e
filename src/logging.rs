//! Tracing subscriber setup for the command line tool.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug` when `verbose`.
/// Calling this more than once keeps the first subscriber.
pub fn init(verbose: bool) {
  let default_level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
  let filter = EnvFilter::builder()
    .with_default_directive(default_level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .compact()
    .try_init();
}
