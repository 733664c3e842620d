//! Shutdown signalling shared between the render loop, the quit key and
//! SIGINT/SIGTERM.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Instant;

/// Why playback stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    QuitKey,
    Signal,
}

#[derive(Debug, Default)]
struct Inner {
    reason: Mutex<Option<ShutdownReason>>,
    wake: Condvar,
}

/// Cloneable handle to a one-shot shutdown request.
///
/// The first request wins; later ones are ignored. Sleepers in
/// [`ShutdownSignal::sleep_until`] wake as soon as a request arrives.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a shutdown request. Returns false if one was already recorded.
    pub fn request(&self, reason: ShutdownReason) -> bool {
        let mut slot = lock(&self.inner.reason);
        if slot.is_some() {
            return false;
        }
        *slot = Some(reason);
        self.inner.wake.notify_all();
        true
    }

    pub fn reason(&self) -> Option<ShutdownReason> {
        *lock(&self.inner.reason)
    }

    /// Block until `deadline` or until shutdown is requested.
    /// Returns true if woken by a shutdown request.
    pub fn sleep_until(&self, deadline: Instant) -> bool {
        let mut slot = lock(&self.inner.reason);
        loop {
            if slot.is_some() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            slot = match self.inner.wake.wait_timeout(slot, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Route SIGINT and SIGTERM into `signal`.
///
/// This should be called once at program startup.
pub fn install_signal_handler(signal: &ShutdownSignal) -> Result<(), ctrlc::Error> {
    let signal = signal.clone();
    ctrlc::set_handler(move || {
        if signal.request(ShutdownReason::Signal) {
            log::info!("Received termination signal, shutting down");
        }
    })
}
