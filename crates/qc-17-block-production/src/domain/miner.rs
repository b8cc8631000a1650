//! Multi-threaded proof-of-work search
//!
//! `mine` spawns one worker per thread. Worker `i` starts at
//! `template nonce + i` and advances by the thread count, so workers cover
//! disjoint, interleaved nonce sequences. All workers are joined before
//! `mine` returns, whatever the outcome.
//!
//! The only state workers share is the [`AtomicMiningState`] cell, read once
//! per hash and written at most once per worker.

use super::pow::ProofOfWork;
use super::signal::CompletionSignal;
use super::state::{AtomicMiningState, MiningState};
use crate::config::MinerConfig;
use crate::error::MinerError;
use crate::metrics::MiningMetrics;
use parking_lot::Mutex;
use shared_types::entities::{Block, Difficulty};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Inputs to a single `mine` call
#[derive(Clone, Debug)]
pub struct BlockMiningParameters {
    /// Template to mine; its nonce is the search base
    pub block_template: Block,
    /// Difficulty the block hash must satisfy
    pub difficulty: Difficulty,
}

/// PoW nonce search service
pub struct Miner<P: ProofOfWork> {
    pow: P,
    config: MinerConfig,
    state: AtomicMiningState,
    mining_stopped: CompletionSignal,
    /// Held for the whole of a `mine` call
    call: Mutex<()>,
    block: Mutex<Option<Block>>,
    metrics: Arc<MiningMetrics>,
}

impl<P: ProofOfWork> Miner<P> {
    /// Create a miner with default configuration
    pub fn new(pow: P) -> Self {
        Self::with_config(pow, MinerConfig::default())
    }

    /// Create a miner with explicit configuration
    pub fn with_config(pow: P, config: MinerConfig) -> Self {
        Self {
            pow,
            config,
            state: AtomicMiningState::default(),
            mining_stopped: CompletionSignal::new(),
            call: Mutex::new(()),
            block: Mutex::new(None),
            metrics: Arc::new(MiningMetrics::new()),
        }
    }

    /// Current state of the engine
    pub fn state(&self) -> MiningState {
        self.state.load()
    }

    /// Configuration this miner was built with
    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// The proof-of-work backend
    pub fn proof_of_work(&self) -> &P {
        &self.pow
    }

    /// Shared metrics handle
    pub fn metrics(&self) -> Arc<MiningMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Winning block of the most recent successful `mine` call
    pub fn last_block(&self) -> Option<Block> {
        self.block.lock().clone()
    }

    /// Search for a block satisfying `parameters.difficulty` on
    /// `thread_count` workers.
    ///
    /// Blocks until every worker has exited. Returns the winning block, or
    /// [`MinerError::Interrupted`] if the search was stopped or a worker
    /// failed.
    #[tracing::instrument(skip(self, parameters), fields(difficulty = parameters.difficulty))]
    pub fn mine(
        &self,
        parameters: BlockMiningParameters,
        thread_count: usize,
    ) -> Result<Block, MinerError> {
        let nonce_step = match u32::try_from(thread_count) {
            Ok(step) if step > 0 => step,
            _ => {
                return Err(MinerError::InvalidThreadCount {
                    requested: thread_count,
                })
            }
        };

        let Some(_call) = self.call.try_lock() else {
            return Err(MinerError::AlreadyInProgress);
        };
        if self.state.load() == MiningState::InProgress {
            return Err(MinerError::AlreadyInProgress);
        }

        let started = Instant::now();
        self.mining_stopped.clear();
        self.block.lock().take();
        self.state.store(MiningState::InProgress);

        self.run_workers(parameters, nonce_step);

        let state = self.state.load();
        debug_assert_ne!(state, MiningState::InProgress);
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if state == MiningState::BlockFound {
            if let Some(block) = self.block.lock().clone() {
                self.metrics.record_search(true, elapsed_ms);
                return Ok(block);
            }
            error!("Block marked found but no block was recorded");
            self.state.store(MiningState::Stopped);
        }

        debug!("Mining has been stopped");
        self.metrics.record_search(false, elapsed_ms);
        Err(MinerError::Interrupted)
    }

    /// Abort a running search.
    ///
    /// If a search is in progress, blocks until all of its workers have
    /// exited. Otherwise does nothing.
    pub fn stop(&self) {
        if self
            .state
            .transition(MiningState::InProgress, MiningState::Stopped)
        {
            debug!("Stop requested, waiting for workers");
            self.mining_stopped.wait();
            self.mining_stopped.clear();
        }
    }

    fn run_workers(&self, parameters: BlockMiningParameters, nonce_step: u32) {
        let BlockMiningParameters {
            mut block_template,
            difficulty,
        } = parameters;

        if self.config.randomize_start_nonce {
            block_template.header.nonce = rand::random();
        }

        info!(
            difficulty,
            threads = nonce_step,
            start_nonce = block_template.nonce(),
            "Starting mining"
        );

        thread::scope(|scope| {
            let mut workers = Vec::with_capacity(nonce_step as usize);

            for index in 0..nonce_step {
                let mut block = block_template.clone();
                block.advance_nonce(index);

                let spawned = thread::Builder::new()
                    .name(format!("miner-{index}"))
                    .spawn_scoped(scope, move || self.worker(block, difficulty, nonce_step));

                match spawned {
                    Ok(handle) => workers.push(handle),
                    Err(e) => {
                        error!(error = %e, "Failed to spawn mining worker");
                        self.state.store(MiningState::Stopped);
                        break;
                    }
                }
            }

            for worker in workers {
                if worker.join().is_err() {
                    error!("Mining worker panicked");
                    self.state.store(MiningState::Stopped);
                }
            }
        });

        self.mining_stopped.set();
    }

    fn worker(&self, mut block: Block, difficulty: Difficulty, nonce_step: u32) {
        let _unwind = StopOnPanic(&self.state);
        let mut attempts = 0u64;

        while self.state.load() == MiningState::InProgress {
            let hash = match self.pow.hash(&block) {
                Ok(hash) => hash,
                Err(e) => {
                    warn!(error = %e, nonce = block.nonce(), "Calculating hash failed");
                    self.state.store(MiningState::Stopped);
                    break;
                }
            };
            attempts += 1;

            if self.pow.check(&hash, difficulty) {
                info!(difficulty, nonce = block.nonce(), "Found block");

                if self
                    .state
                    .transition(MiningState::InProgress, MiningState::BlockFound)
                {
                    *self.block.lock() = Some(block);
                } else {
                    debug!("Block is already found or mining stopped");
                }
                break;
            }

            block.advance_nonce(nonce_step);
        }

        self.metrics.record_attempts(attempts);
    }
}

/// Forces `Stopped` when a worker unwinds, so its siblings exit before the
/// join loop reaches it.
struct StopOnPanic<'a>(&'a AtomicMiningState);

impl Drop for StopOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(MiningState::Stopped);
        }
    }
}

impl<P: ProofOfWork> Drop for Miner<P> {
    fn drop(&mut self) {
        debug_assert_ne!(self.state.load(), MiningState::InProgress);
    }
}
