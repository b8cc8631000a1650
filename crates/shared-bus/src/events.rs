//! # Blockchain Messages
//!
//! The closed set of events the core publishes to subscriber queues.
//! Each variant is identified by a [`MessageType`] tag, and each payload has
//! a typed accessor that returns `None` when the message is a different
//! variant.

use serde::{Deserialize, Serialize};
use shared_types::entities::Hash;

/// Discriminant of a [`BlockchainMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// A block was added to the main chain.
    NewBlock,
    /// A block was added to an alternative chain.
    NewAlternativeBlock,
    /// The main chain switched to a different branch.
    ChainSwitch,
    /// Transactions entered the pool.
    AddTransaction,
    /// Transactions left the pool.
    DeleteTransaction,
}

/// Why transactions left the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteTransactionReason {
    /// Included in a block.
    InBlock,
    /// Expired while waiting.
    Outdated,
    /// No longer valid against the current chain.
    NotActual,
}

/// Events fanned out to every registered subscriber queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockchainMessage {
    /// A block was added to the main chain.
    NewBlock {
        /// Hash of the new block.
        block_hash: Hash,
    },

    /// A block was added to an alternative chain.
    NewAlternativeBlock {
        /// Hash of the new block.
        block_hash: Hash,
    },

    /// The main chain switched branches.
    ChainSwitch {
        /// Hashes of the new branch, oldest first.
        block_hashes: Vec<Hash>,
    },

    /// Transactions entered the pool.
    AddTransaction {
        /// Hashes of the added transactions.
        transaction_hashes: Vec<Hash>,
    },

    /// Transactions left the pool.
    DeleteTransaction {
        /// Hashes of the removed transactions.
        transaction_hashes: Vec<Hash>,
        /// Why they were removed.
        reason: DeleteTransactionReason,
    },
}

impl BlockchainMessage {
    /// Variant tag.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::NewBlock { .. } => MessageType::NewBlock,
            Self::NewAlternativeBlock { .. } => MessageType::NewAlternativeBlock,
            Self::ChainSwitch { .. } => MessageType::ChainSwitch,
            Self::AddTransaction { .. } => MessageType::AddTransaction,
            Self::DeleteTransaction { .. } => MessageType::DeleteTransaction,
        }
    }

    /// Block hash of a `NewBlock` message.
    #[must_use]
    pub fn new_block_hash(&self) -> Option<Hash> {
        match self {
            Self::NewBlock { block_hash } => Some(*block_hash),
            _ => None,
        }
    }

    /// Block hash of a `NewAlternativeBlock` message.
    #[must_use]
    pub fn new_alternative_block_hash(&self) -> Option<Hash> {
        match self {
            Self::NewAlternativeBlock { block_hash } => Some(*block_hash),
            _ => None,
        }
    }

    /// Branch hashes of a `ChainSwitch` message.
    #[must_use]
    pub fn chain_switch(&self) -> Option<&[Hash]> {
        match self {
            Self::ChainSwitch { block_hashes } => Some(block_hashes),
            _ => None,
        }
    }

    /// Transaction hashes of an `AddTransaction` message.
    #[must_use]
    pub fn added_transactions(&self) -> Option<&[Hash]> {
        match self {
            Self::AddTransaction { transaction_hashes } => Some(transaction_hashes),
            _ => None,
        }
    }

    /// Transaction hashes and reason of a `DeleteTransaction` message.
    #[must_use]
    pub fn deleted_transactions(&self) -> Option<(&[Hash], DeleteTransactionReason)> {
        match self {
            Self::DeleteTransaction {
                transaction_hashes,
                reason,
            } => Some((transaction_hashes, *reason)),
            _ => None,
        }
    }
}
