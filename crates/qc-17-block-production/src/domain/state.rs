//! Mining state machine
//!
//! ```text
//!            mine()                 worker wins CAS
//!  Stopped ─────────► InProgress ─────────────────► BlockFound
//!     ▲                   │                             │
//!     │   stop() CAS /    │                             │ mine()
//!     └── hash failure ───┘                             ▼
//!                                                  InProgress
//! ```
//!
//! One atomic cell orders the three possible outcomes of a search
//! (stopped first, found first, failed first) without locks.

use std::sync::atomic::{AtomicU8, Ordering};

/// State of the miner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MiningState {
    /// Idle, or the last search was stopped or failed.
    Stopped = 0,
    /// Workers are searching.
    InProgress = 1,
    /// A worker recorded a qualifying block for the current call.
    BlockFound = 2,
}

impl MiningState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::InProgress,
            2 => Self::BlockFound,
            _ => Self::Stopped,
        }
    }
}

/// Lock-free cell holding a [`MiningState`].
#[derive(Debug)]
pub struct AtomicMiningState(AtomicU8);

impl AtomicMiningState {
    /// Create a cell holding `state`.
    pub fn new(state: MiningState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    /// Current state.
    pub fn load(&self) -> MiningState {
        MiningState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Unconditionally set the state.
    pub fn store(&self, state: MiningState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Move from `current` to `new` if the cell still holds `current`.
    ///
    /// Exactly one of any number of concurrent callers racing on the same
    /// `current` succeeds.
    pub fn transition(&self, current: MiningState, new: MiningState) -> bool {
        self.0
            .compare_exchange(current as u8, new as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for AtomicMiningState {
    fn default() -> Self {
        Self::new(MiningState::Stopped)
    }
}
