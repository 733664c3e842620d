//! Fixed-rate render loop.
//!
//! Each tick: skip vanished frames, poll input, snapshot the configuration,
//! clear the screen, run the rasterizer, paint the HUD, then sleep to the
//! next tick boundary. The loop wraps around the frame list until a quit
//! key or a termination signal arrives.

use std::io::Write;
use std::time::Instant;

use crate::error::PlayerError;
use crate::frames::FrameList;
use crate::hud::Hud;
use crate::input::{EventSource, InputPoller};
use crate::rasterizer::{build_args, Rasterize};
use crate::render_config::RenderConfig;
use crate::shutdown::{ShutdownReason, ShutdownSignal};
use crate::terminal::clear_screen;

/// Lifecycle of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Running,
    ShuttingDown(ShutdownReason),
}

/// Drives playback of a frame list at the configured rate.
pub struct FrameScheduler<S: EventSource, R: Rasterize, W: Write> {
    frames: FrameList,
    config: RenderConfig,
    /// Present only in interactive mode
    poller: Option<InputPoller<S>>,
    rasterizer: R,
    out: W,
    hud: Hud,
    shutdown: ShutdownSignal,
    state: PlayerState,
    position: usize,
    rendered: u64,
}

impl<S: EventSource, R: Rasterize, W: Write> FrameScheduler<S, R, W> {
    pub fn new(
        frames: FrameList,
        config: RenderConfig,
        poller: Option<InputPoller<S>>,
        rasterizer: R,
        out: W,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            frames,
            config,
            poller,
            rasterizer,
            out,
            hud: Hud::new(),
            shutdown,
            state: PlayerState::Running,
            position: 0,
            rendered: 0,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Number of frames handed to the rasterizer so far.
    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// The writer that receives screen clears and the HUD.
    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn is_interactive(&self) -> bool {
        self.poller.is_some()
    }

    /// Run until shutdown is requested.
    ///
    /// Rasterizer failures and vanished frames are logged and skipped.
    /// Only terminal I/O errors end the loop early.
    pub fn run(&mut self) -> Result<ShutdownReason, PlayerError> {
        if self.frames.is_empty() {
            return Err(PlayerError::NoFrames(self.frames.dir().to_path_buf()));
        }

        let mut next_tick = Instant::now();
        let mut consecutive_skips = 0usize;

        loop {
            if let Some(reason) = self.shutdown.reason() {
                self.state = PlayerState::ShuttingDown(reason);
                log::info!("Shutting down ({:?}) after {} frames", reason, self.rendered);
                return Ok(reason);
            }

            if self.render_tick()? {
                consecutive_skips = 0;
            } else {
                consecutive_skips += 1;
                if consecutive_skips < self.frames.len() {
                    continue;
                }
                // Every frame is gone; wait a tick instead of spinning
                consecutive_skips = 0;
            }

            let now = Instant::now();
            next_tick += self.config.tick_interval();
            if next_tick < now {
                // Overran the tick; no catch-up
                next_tick = now;
            }
            self.shutdown.sleep_until(next_tick);
        }
    }

    /// Process the frame at the current position and advance.
    ///
    /// Returns false if the frame was skipped because its file vanished.
    fn render_tick(&mut self) -> Result<bool, PlayerError> {
        let index = self.position;
        self.position = (self.position + 1) % self.frames.len();

        let Some(frame) = self.frames.get(index) else {
            return Ok(false);
        };
        if !frame.is_file() {
            log::warn!("Skipping missing frame {}", frame.display());
            return Ok(false);
        }

        if let Some(poller) = self.poller.as_mut() {
            let outcome = poller.poll(&mut self.config)?;
            if outcome.quit {
                self.shutdown.request(ShutdownReason::QuitKey);
                return Ok(true);
            }
        }

        let snapshot = self.config.snapshot();
        let args = build_args(&snapshot);

        clear_screen(&mut self.out)?;
        if let Err(e) = self.rasterizer.render(frame, &args) {
            log::warn!("Frame {}: {}", frame.display(), e);
        }
        self.rendered += 1;

        if self.poller.is_some() {
            self.hud.paint(&mut self.out, &snapshot)?;
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CrosstermEvents;
    use crate::rasterizer::RasterError;
    use std::path::{Path, PathBuf};

    /// Records every invocation and asks for shutdown after `limit` frames.
    struct Recording {
        calls: Vec<(PathBuf, Vec<String>)>,
        limit: usize,
        shutdown: ShutdownSignal,
        fail: bool,
    }

    impl Rasterize for Recording {
        fn render(&mut self, frame: &Path, args: &[String]) -> Result<(), RasterError> {
            self.calls.push((frame.to_path_buf(), args.to_vec()));
            if self.calls.len() >= self.limit {
                self.shutdown.request(ShutdownReason::Signal);
            }
            if self.fail {
                return Err(RasterError::NotFound {
                    program: "jp2a".to_string(),
                });
            }
            Ok(())
        }
    }

    fn frame_dir(count: usize) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..count {
            std::fs::write(dir.path().join(format!("frame_{:04}.png", i)), b"").unwrap();
        }
        dir
    }

    #[test]
    fn test_wraps_around_frame_list() {
        let dir = frame_dir(2);
        let frames = FrameList::discover(dir.path()).unwrap();
        let shutdown = ShutdownSignal::new();
        let rasterizer = Recording {
            calls: Vec::new(),
            limit: 5,
            shutdown: shutdown.clone(),
            fail: false,
        };
        let mut config = RenderConfig::default();
        config.set_fps(1000);

        let mut scheduler = FrameScheduler::<CrosstermEvents, _, _>::new(
            frames,
            config,
            None,
            rasterizer,
            Vec::new(),
            shutdown,
        );
        let reason = scheduler.run().unwrap();

        assert_eq!(reason, ShutdownReason::Signal);
        assert_eq!(scheduler.state(), PlayerState::ShuttingDown(ShutdownReason::Signal));
        let names: Vec<_> = scheduler
            .rasterizer
            .calls
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "frame_0000.png",
                "frame_0001.png",
                "frame_0000.png",
                "frame_0001.png",
                "frame_0000.png"
            ]
        );
    }

    #[test]
    fn test_rasterizer_failure_does_not_stop_loop() {
        let dir = frame_dir(1);
        let frames = FrameList::discover(dir.path()).unwrap();
        let shutdown = ShutdownSignal::new();
        let rasterizer = Recording {
            calls: Vec::new(),
            limit: 3,
            shutdown: shutdown.clone(),
            fail: true,
        };
        let mut config = RenderConfig::default();
        config.set_fps(1000);

        let mut scheduler = FrameScheduler::<CrosstermEvents, _, _>::new(
            frames, config, None, rasterizer, Vec::new(), shutdown,
        );
        scheduler.run().unwrap();
        assert_eq!(scheduler.rendered(), 3);
    }

    #[test]
    fn test_vanished_frame_is_skipped() {
        let dir = frame_dir(3);
        let frames = FrameList::discover(dir.path()).unwrap();
        std::fs::remove_file(dir.path().join("frame_0001.png")).unwrap();

        let shutdown = ShutdownSignal::new();
        let rasterizer = Recording {
            calls: Vec::new(),
            limit: 4,
            shutdown: shutdown.clone(),
            fail: false,
        };
        let mut config = RenderConfig::default();
        config.set_fps(1000);

        let mut scheduler = FrameScheduler::<CrosstermEvents, _, _>::new(
            frames, config, None, rasterizer, Vec::new(), shutdown,
        );
        scheduler.run().unwrap();

        assert!(scheduler
            .rasterizer
            .calls
            .iter()
            .all(|(p, _)| !p.ends_with("frame_0001.png")));
    }

    #[test]
    fn test_non_interactive_paints_no_hud() {
        let dir = frame_dir(1);
        let frames = FrameList::discover(dir.path()).unwrap();
        let shutdown = ShutdownSignal::new();
        let rasterizer = Recording {
            calls: Vec::new(),
            limit: 1,
            shutdown: shutdown.clone(),
            fail: false,
        };

        let mut scheduler = FrameScheduler::<CrosstermEvents, _, _>::new(
            frames,
            RenderConfig::default(),
            None,
            rasterizer,
            Vec::new(),
            shutdown,
        );
        scheduler.run().unwrap();

        let text = String::from_utf8(scheduler.out.clone()).unwrap();
        assert!(text.contains("\x1b[2J"));
        assert!(!text.contains("fps:"));
    }

    #[test]
    fn test_pending_shutdown_returns_before_rendering() {
        let dir = frame_dir(1);
        let frames = FrameList::discover(dir.path()).unwrap();
        let shutdown = ShutdownSignal::new();
        shutdown.request(ShutdownReason::Signal);
        let rasterizer = Recording {
            calls: Vec::new(),
            limit: 1,
            shutdown: shutdown.clone(),
            fail: false,
        };

        let mut scheduler = FrameScheduler::<CrosstermEvents, _, _>::new(
            frames,
            RenderConfig::default(),
            None,
            rasterizer,
            Vec::new(),
            shutdown,
        );
        assert_eq!(scheduler.run().unwrap(), ShutdownReason::Signal);
        assert_eq!(scheduler.rendered(), 0);
    }
}
