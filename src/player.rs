//! Top-level playback: validate, take the terminal, run, give it back.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::DEFAULT_INPUT_BUDGET;
use crate::error::PlayerError;
use crate::frames::FrameList;
use crate::input::{EventSource, InputPoller};
use crate::rasterizer::Rasterize;
use crate::render_config::RenderConfig;
use crate::scheduler::FrameScheduler;
use crate::shutdown::{ShutdownReason, ShutdownSignal};
use crate::terminal::{TerminalBackend, TerminalSession};

/// Everything needed to start playback.
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub frame_dir: PathBuf,
    pub config: RenderConfig,
    pub interactive: bool,
    pub input_budget: Duration,
}

impl PlayerOptions {
    pub fn new(frame_dir: impl Into<PathBuf>, config: RenderConfig) -> Self {
        Self {
            frame_dir: frame_dir.into(),
            config,
            interactive: false,
            input_budget: DEFAULT_INPUT_BUDGET,
        }
    }
}

/// Play the frames in `options.frame_dir` until quit or signal.
///
/// The frame directory is validated before the terminal is touched, so a
/// startup failure leaves cursor and echo exactly as they were. Once the
/// session is acquired it is released on every return path.
pub fn play<B, S, R, W>(
    options: &PlayerOptions,
    backend: B,
    events: S,
    rasterizer: R,
    out: W,
    shutdown: ShutdownSignal,
) -> Result<ShutdownReason, PlayerError>
where
    B: TerminalBackend,
    S: EventSource,
    R: Rasterize,
    W: Write,
{
    let frames = FrameList::discover(&options.frame_dir)?;
    log::info!(
        "Playing {} frames from {} at {} fps{}",
        frames.len(),
        options.frame_dir.display(),
        options.config.fps(),
        if options.interactive { " (interactive)" } else { "" }
    );

    let mut session = TerminalSession::acquire(backend, options.interactive)?;

    let poller = options
        .interactive
        .then(|| InputPoller::new(events, options.input_budget));
    let mut scheduler = FrameScheduler::new(
        frames,
        options.config.clone(),
        poller,
        rasterizer,
        out,
        shutdown,
    );

    let result = scheduler.run();
    let released = session.release();
    let reason = result?;
    released?;
    Ok(reason)
}
