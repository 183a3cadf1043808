//! Logging initialization for the CLI.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `verbosity`: 0 = WARN, 1 = DEBUG, 2+ = TRACE. `RUST_LOG` is honoured when
/// no `-v` is given.
pub fn init(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::default().add_directive(Level::DEBUG.into()),
        _ => EnvFilter::default().add_directive(Level::TRACE.into()),
    };

    // Diagnostics own stderr's layout; a subscriber set elsewhere wins.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
