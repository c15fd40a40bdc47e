//! Diagnostics on stderr through `tracing`
//!
//! Until `init` runs no subscriber is installed and every event is dropped.

use std::io::{self, IsTerminal};
use tracing::Level;

/// Install the stderr subscriber; `verbose` enables debug events
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none())
        .with_target(false)
        .without_time()
        .init();
}
