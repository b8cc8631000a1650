//! Settable, clearable completion signal with blocking wait.

use parking_lot::{Condvar, Mutex};

/// Manual-reset event: `wait` blocks until `set`, and stays satisfied until
/// `clear`.
#[derive(Debug, Default)]
pub struct CompletionSignal {
    set: Mutex<bool>,
    changed: Condvar,
}

impl CompletionSignal {
    /// Create an unset signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal and wake every waiter.
    pub fn set(&self) {
        *self.set.lock() = true;
        self.changed.notify_all();
    }

    /// Reset the signal.
    pub fn clear(&self) {
        *self.set.lock() = false;
    }

    /// Whether the signal is currently set.
    pub fn is_set(&self) -> bool {
        *self.set.lock()
    }

    /// Block until the signal is set.
    pub fn wait(&self) {
        let mut set = self.set.lock();
        while !*set {
            self.changed.wait(&mut set);
        }
    }
}
