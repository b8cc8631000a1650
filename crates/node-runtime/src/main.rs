//! # Quantum-Chain Node Runtime
//!
//! Mines a chain of proof-of-work blocks and broadcasts each one to the
//! subscribers of the event bus.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG`, default `info`)
//! 2. Load configuration from the environment
//! 3. Start the chain observer (if enabled)
//! 4. Start the mining loop
//! 5. Run until Ctrl+C or until `QC_MAX_BLOCKS` blocks are mined

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use node_runtime::{NodeConfig, NodeRuntime};
use shared_bus::MessagePublisher;

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = NodeConfig::from_env().context("Invalid node configuration")?;
    let observe = config.observer;

    let runtime = Arc::new(NodeRuntime::new(config));
    info!("===========================================");
    info!("  Quantum-Chain Node Runtime v0.1.0");
    info!("  Proof-of-work mining, {} threads", runtime.config().mining.threads);
    info!("===========================================");

    let observer = observe.then(|| runtime.spawn_observer());

    let mut mining = {
        let runtime = Arc::clone(&runtime);
        tokio::spawn(async move { runtime.run_mining().await })
    };

    info!("Node is running. Press Ctrl+C to stop.");
    let finished = tokio::select! {
        joined = &mut mining => Some(joined.context("Mining task panicked")??),
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            None
        }
    };

    let mined = match finished {
        Some(mined) => {
            runtime.bus().interrupt();
            mined
        }
        None => runtime.shutdown(mining).await?,
    };

    if let Some(observer) = observer {
        let seen = observer.await.context("Chain observer panicked")?;
        info!(events = seen, "Chain observer finished");
    }

    info!(blocks = mined, "Node stopped");
    Ok(())
}
