//! Keyboard input handling.
//!
//! This module handles:
//! - Mapping key events onto [`RenderConfig`] mutations
//! - Draining pending terminal events within a fixed time budget per tick

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::{Duration, Instant};

use crate::render_config::{Adjust, Channel, RenderConfig, Toggle};

/// Result of handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Key changed the render configuration
    Handled,
    /// Key asked for an orderly shutdown
    Quit,
    /// Key is not bound
    None,
}

/// Apply a key event to the configuration.
///
/// Bindings:
/// - `1`..`0`: toggles (color, edges, invert, depth cycle, border, flip-x,
///   flip-y, term-fit, term-center, term-zoom)
/// - `x` grayscale, `y` background cycle, `f` fill, `p` HUD, `s` explicit size
/// - `r`/`g`/`b` lower a channel weight, `R`/`G`/`B` raise it
/// - `w`/`W` widen/narrow, `h`/`H` taller/shorter
/// - Left/Right: fps down/up, Up/Down: edge threshold up/down
/// - `q`, `Q`, Ctrl+C: quit
///
/// Alt-modified keys (a stray escape sequence) are ignored.
pub fn handle_key_event(event: KeyEvent, config: &mut RenderConfig) -> KeyAction {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = event;

    if kind == KeyEventKind::Release {
        return KeyAction::None;
    }

    // Under a full raw mode Ctrl+C arrives as a key instead of SIGINT
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('C') => KeyAction::Quit,
            _ => KeyAction::None,
        };
    }

    // ESC followed by anything but an arrow is decoded as Alt+key; drop it
    if modifiers.contains(KeyModifiers::ALT) {
        return KeyAction::None;
    }

    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return KeyAction::Quit,

        KeyCode::Char('1') => config.toggle(Toggle::Color),
        KeyCode::Char('2') => config.toggle(Toggle::EdgesOnly),
        KeyCode::Char('3') => config.toggle(Toggle::Invert),
        KeyCode::Char('4') => config.cycle_color_depth(),
        KeyCode::Char('5') => config.toggle(Toggle::Border),
        KeyCode::Char('6') => config.toggle(Toggle::FlipX),
        KeyCode::Char('7') => config.toggle(Toggle::FlipY),
        KeyCode::Char('8') => config.toggle(Toggle::TermFit),
        KeyCode::Char('9') => config.toggle(Toggle::TermCenter),
        KeyCode::Char('0') => config.toggle(Toggle::TermZoom),
        KeyCode::Char('x') | KeyCode::Char('X') => config.toggle(Toggle::Grayscale),
        KeyCode::Char('y') | KeyCode::Char('Y') => config.cycle_background(),
        KeyCode::Char('f') | KeyCode::Char('F') => config.toggle(Toggle::Fill),
        KeyCode::Char('p') | KeyCode::Char('P') => config.toggle(Toggle::Hud),
        KeyCode::Char('s') | KeyCode::Char('S') => config.toggle(Toggle::ExplicitSize),

        KeyCode::Char('r') => config.adjust_weight(Channel::Red, Adjust::Decrease),
        KeyCode::Char('R') => config.adjust_weight(Channel::Red, Adjust::Increase),
        KeyCode::Char('g') => config.adjust_weight(Channel::Green, Adjust::Decrease),
        KeyCode::Char('G') => config.adjust_weight(Channel::Green, Adjust::Increase),
        KeyCode::Char('b') => config.adjust_weight(Channel::Blue, Adjust::Decrease),
        KeyCode::Char('B') => config.adjust_weight(Channel::Blue, Adjust::Increase),

        KeyCode::Char('w') => config.adjust_width(Adjust::Increase),
        KeyCode::Char('W') => config.adjust_width(Adjust::Decrease),
        KeyCode::Char('h') => config.adjust_height(Adjust::Increase),
        KeyCode::Char('H') => config.adjust_height(Adjust::Decrease),

        KeyCode::Left => config.adjust_fps(Adjust::Decrease),
        KeyCode::Right => config.adjust_fps(Adjust::Increase),
        KeyCode::Up => config.adjust_edge_threshold(Adjust::Increase),
        KeyCode::Down => config.adjust_edge_threshold(Adjust::Decrease),

        _ => return KeyAction::None,
    }

    KeyAction::Handled
}

/// A source of terminal events that can be polled with a timeout.
pub trait EventSource {
    /// Wait up to `timeout` for an event. Returns true if one is ready.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    /// Read the next event. Only called after `poll` returned true.
    fn read(&mut self) -> io::Result<Event>;
}

/// Events from the controlling terminal.
///
/// crossterm decodes multi-byte escape sequences (arrow keys) itself and
/// reports a lone or truncated escape as [`KeyCode::Esc`], which is unbound.
#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        crossterm::event::read()
    }
}

/// What a single poll observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollOutcome {
    /// Number of key events that changed the configuration
    pub changes: usize,
    /// A quit key was seen
    pub quit: bool,
}

/// Drains pending key events into a [`RenderConfig`] once per tick.
pub struct InputPoller<S: EventSource> {
    source: S,
    budget: Duration,
}

impl<S: EventSource> InputPoller<S> {
    pub fn new(source: S, budget: Duration) -> Self {
        Self { source, budget }
    }

    /// Apply every event that is already buffered or arrives within the
    /// budget. The source is always asked at least once, so a zero budget
    /// still drains buffered keys without blocking.
    ///
    /// Returns early on a quit key; events after it are left unread.
    pub fn poll(&mut self, config: &mut RenderConfig) -> io::Result<PollOutcome> {
        let deadline = Instant::now() + self.budget;
        let mut outcome = PollOutcome::default();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !self.source.poll(remaining)? {
                break;
            }

            let Event::Key(key_event) = self.source.read()? else {
                continue;
            };

            match handle_key_event(key_event, config) {
                KeyAction::Handled => {
                    outcome.changes += 1;
                    log::debug!("Key {:?} applied", key_event.code);
                }
                KeyAction::Quit => {
                    outcome.quit = true;
                    break;
                }
                KeyAction::None => {}
            }
        }

        Ok(outcome)
    }
}
