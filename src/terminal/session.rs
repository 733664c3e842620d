//! Scoped terminal state with panic-safe, idempotent cleanup.

use std::io::{self, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while the real terminal has its cursor hidden or echo disabled.
/// The panic hook and [`CrosstermTerminal`] both race on this flag so only
/// one of them performs the restore.
pub(crate) static TERMINAL_ALTERED: AtomicBool = AtomicBool::new(false);

/// Set while echo is disabled, so the teardown knows to restore it.
static ECHO_DISABLED: AtomicBool = AtomicBool::new(false);

/// The terminal operations a session needs.
pub trait TerminalBackend {
    fn hide_cursor(&mut self) -> io::Result<()>;
    fn show_cursor(&mut self) -> io::Result<()>;
    /// Stop the terminal from echoing keystrokes.
    fn disable_echo(&mut self) -> io::Result<()>;
    /// Put echo and line settings back to what they were before
    /// [`TerminalBackend::disable_echo`].
    fn restore_echo(&mut self) -> io::Result<()>;
}

/// The process terminal, driven through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermTerminal;

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self
    }
}

impl TerminalBackend for CrosstermTerminal {
    fn hide_cursor(&mut self) -> io::Result<()> {
        TERMINAL_ALTERED.store(true, Ordering::SeqCst);
        crossterm::execute!(io::stdout(), crossterm::cursor::Hide)
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        crossterm::execute!(io::stdout(), crossterm::cursor::Show)?;
        if !ECHO_DISABLED.load(Ordering::SeqCst) {
            TERMINAL_ALTERED.store(false, Ordering::SeqCst);
        }
        Ok(())
    }

    fn disable_echo(&mut self) -> io::Result<()> {
        echo::disable()?;
        ECHO_DISABLED.store(true, Ordering::SeqCst);
        TERMINAL_ALTERED.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn restore_echo(&mut self) -> io::Result<()> {
        if ECHO_DISABLED.swap(false, Ordering::SeqCst) {
            echo::restore()?;
        }
        Ok(())
    }
}

/// Echo control on unix: clear ECHO and ICANON only. Output processing and
/// ISIG stay on, so child output keeps its line endings and Ctrl+C still
/// raises SIGINT.
#[cfg(unix)]
mod echo {
    use std::io;
    use std::sync::Mutex;

    static SAVED: Mutex<Option<libc::termios>> = Mutex::new(None);

    pub(super) fn disable() -> io::Result<()> {
        let fd = libc::STDIN_FILENO;
        let mut termios = std::mem::MaybeUninit::<libc::termios>::uninit();
        // SAFETY: tcgetattr fully initialises `termios` when it returns 0
        let original = unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                return Err(io::Error::last_os_error());
            }
            termios.assume_init()
        };

        let mut quiet = original;
        quiet.c_lflag &= !(libc::ECHO | libc::ICANON);
        quiet.c_cc[libc::VMIN] = 1;
        quiet.c_cc[libc::VTIME] = 0;
        // SAFETY: `quiet` is a valid termios copied from the terminal
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &quiet) } != 0 {
            return Err(io::Error::last_os_error());
        }

        *SAVED.lock().unwrap_or_else(|p| p.into_inner()) = Some(original);
        Ok(())
    }

    pub(super) fn restore() -> io::Result<()> {
        let saved = SAVED.lock().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(original) = saved {
            // SAFETY: `original` came from tcgetattr on the same descriptor
            if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &original) } != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }
}

#[cfg(not(unix))]
mod echo {
    use std::io;

    pub(super) fn disable() -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    pub(super) fn restore() -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }
}

/// Guard that hides the cursor (and, when interactive, disables echo) for
/// its lifetime.
///
/// [`TerminalSession::release`] is the single teardown routine. It runs at
/// most once no matter how many of the quit path, the signal path and
/// `Drop` reach it.
pub struct TerminalSession<B: TerminalBackend> {
    backend: B,
    echo_disabled: bool,
    released: AtomicBool,
}

impl<B: TerminalBackend> TerminalSession<B> {
    /// Hide the cursor and, if `interactive`, disable echo.
    ///
    /// # Errors
    /// Returns an error if the terminal refuses either change. Anything
    /// already changed is put back before returning.
    pub fn acquire(mut backend: B, interactive: bool) -> io::Result<Self> {
        install_panic_hook();

        backend.hide_cursor()?;
        if interactive {
            if let Err(e) = backend.disable_echo() {
                let _ = backend.show_cursor();
                return Err(e);
            }
        }

        Ok(Self {
            backend,
            echo_disabled: interactive,
            released: AtomicBool::new(false),
        })
    }

    /// Restore echo and cursor visibility. Later calls are no-ops.
    pub fn release(&mut self) -> io::Result<()> {
        if self.released.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let echo = if self.echo_disabled {
            self.backend.restore_echo()
        } else {
            Ok(())
        };
        // Show the cursor even when restoring echo failed.
        let cursor = self.backend.show_cursor();
        echo.and(cursor)
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: TerminalBackend> Drop for TerminalSession<B> {
    fn drop(&mut self) {
        // Best-effort cleanup - ignore errors during drop
        let _ = self.release();
    }
}

/// Install a panic hook that restores terminal state before panicking.
pub(crate) fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if TERMINAL_ALTERED.swap(false, Ordering::SeqCst) {
            if ECHO_DISABLED.swap(false, Ordering::SeqCst) {
                let _ = echo::restore();
            }
            let mut stdout = io::stdout();
            let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
            let _ = stdout.flush();
        }

        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        fail_echo: bool,
    }

    impl TerminalBackend for Recorder {
        fn hide_cursor(&mut self) -> io::Result<()> {
            self.calls.push("hide");
            Ok(())
        }
        fn show_cursor(&mut self) -> io::Result<()> {
            self.calls.push("show");
            Ok(())
        }
        fn disable_echo(&mut self) -> io::Result<()> {
            if self.fail_echo {
                return Err(io::Error::other("no tty"));
            }
            self.calls.push("echo-off");
            Ok(())
        }
        fn restore_echo(&mut self) -> io::Result<()> {
            self.calls.push("echo-on");
            Ok(())
        }
    }

    #[test]
    fn test_interactive_session_restores_echo_then_cursor() {
        let mut session = TerminalSession::acquire(Recorder::default(), true).unwrap();
        assert_eq!(session.backend().calls, vec!["hide", "echo-off"]);

        session.release().unwrap();
        assert_eq!(
            session.backend().calls,
            vec!["hide", "echo-off", "echo-on", "show"]
        );
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut session = TerminalSession::acquire(Recorder::default(), false).unwrap();
        session.release().unwrap();
        session.release().unwrap();
        assert!(session.is_released());
        assert_eq!(session.backend().calls, vec!["hide", "show"]);
    }

    #[test]
    fn test_failed_echo_disable_is_error() {
        let backend = Recorder {
            fail_echo: true,
            ..Default::default()
        };
        assert!(TerminalSession::acquire(backend, true).is_err());
    }

    #[test]
    fn test_panic_hook_installation() {
        install_panic_hook();
        install_panic_hook(); // Second call should be no-op
    }
}
