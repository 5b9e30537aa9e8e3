//! Log output for the terminal UI.
//!
//! The terminal is owned by the UI while the program runs, so events are
//! written to a file instead of stderr.

use std::{fs::File, path::Path, sync::Mutex};

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const FILTER_ENV: &str = "BLOCKFALL_LOG";
const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber, writing plain-text events to `path`.
pub(crate) fn init(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file: {}", path.display()))?;
    let filter =
        EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("failed to install the log subscriber")
}
