//! Tracing subscriber setup
//!
//! Logs go to stderr so stdout only ever carries the rendered tree.

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{ fmt, EnvFilter };

/// Level used when `RUST_LOG` is unset, from the number of `-v` flags.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// verbosity default.
pub fn init(verbosity: u8) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy();

    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let _ = tracing_subscriber::registry().with(fmt_layer).with(env_filter).try_init();
}
