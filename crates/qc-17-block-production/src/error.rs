//! Error types for block production subsystem

use thiserror::Error;

/// Result type alias for block production operations
pub type Result<T> = std::result::Result<T, BlockProductionError>;

/// Outcomes of [`crate::Miner::mine`] other than a found block
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MinerError {
    /// Thread count was zero or does not fit a nonce stride
    #[error("Miner requires between 1 and {max} threads, got {requested}", max = u32::MAX)]
    InvalidThreadCount {
        /// Requested thread count
        requested: usize,
    },

    /// Another `mine` call is still running on this miner
    #[error("Mining is already in progress")]
    AlreadyInProgress,

    /// The search ended without a block: stopped, or a worker failed
    #[error("Mining interrupted")]
    Interrupted,
}

impl MinerError {
    /// Check if this is the cooperative-cancellation outcome rather than a
    /// precondition violation
    pub fn is_interruption(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

/// Errors that can occur while producing and announcing a block
#[derive(Debug, Error)]
pub enum BlockProductionError {
    /// Mining did not produce a block
    #[error(transparent)]
    Mining(#[from] MinerError),

    /// The blocking mining task could not be joined
    #[error("Mining task failed: {0}")]
    TaskFailed(String),
}

impl BlockProductionError {
    /// Check if error is recoverable (the caller may simply mine again)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Mining(MinerError::Interrupted | MinerError::AlreadyInProgress)
        )
    }
}
