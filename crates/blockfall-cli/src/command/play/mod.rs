use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::PieceSeed;
use ratatui_runtime::{RenderMode, Runtime, ScreenStack};
use tracing::info;

use self::screens::HostScreen;
use crate::logging;

mod screens;

const DEFAULT_FRAME_RATE: f64 = 60.0;
const DEFAULT_LOG_FILE: &str = "blockfall.log";

#[derive(Debug, Clone, PartialEq, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence (32 hex digits); random when omitted
    #[clap(long)]
    pub(super) seed: Option<PieceSeed>,
    /// Maximum number of screen renders per second
    #[clap(long, default_value_t = DEFAULT_FRAME_RATE)]
    pub(super) frame_rate: f64,
    /// File receiving the log output; the filter is read from `BLOCKFALL_LOG`
    #[clap(long, default_value = DEFAULT_LOG_FILE)]
    pub(super) log_file: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            frame_rate: DEFAULT_FRAME_RATE,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        frame_rate,
        log_file,
    } = arg;

    anyhow::ensure!(
        frame_rate.is_finite() && *frame_rate > 0.0,
        "frame rate must be a positive number, got {frame_rate}"
    );
    logging::init(log_file)?;
    match seed {
        Some(seed) => info!(%seed, "starting with a fixed piece seed"),
        None => info!("starting with random pieces"),
    }

    let mut runtime = Runtime::new();
    runtime.set_render_mode(RenderMode::throttled_from_rate(*frame_rate));
    let mut screens = ScreenStack::new(Box::new(HostScreen::new(*seed)));
    runtime
        .run(&mut screens)
        .context("terminal session failed")?;

    info!("exited");
    Ok(())
}
