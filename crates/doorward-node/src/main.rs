//! `doorward`: door node running against emulated peripherals.
//!
//! Reads `DOORWARD_CONFIG` for its configuration. Type stimulus lines on
//! stdin (`motion on`, `card E3 87 26 29`, `door open`, `shake on`,
//! `remote open`) to drive the mock devices.

use anyhow::Context;
use doorward_controller::{CompositeSink, LocalSink};
use doorward_core::{NodeConfig, SystemClock, VERSION};
use doorward_hardware::mock::MockFeedback;
use doorward_node::{DoorNode, Stimulus, emulated_peripherals, emulator, init_tracing};
use doorward_remote::{MemoryStore, RemoteLink};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = NodeConfig::load_from_env().context("failed to load configuration")?;
    init_tracing(&config.logging)?;
    info!(version = VERSION, "doorward node starting");

    let (peripherals, handles) = emulated_peripherals();
    let (feedback, _display) = MockFeedback::new();

    let (commands, events, store_handle, control_key, clock) = match &config.remote {
        Some(remote) => {
            let (store, store_handle) = MemoryStore::new();
            let (commands, events) = RemoteLink::connect(store, remote).await.split();
            (
                Some(commands),
                Some(events),
                Some(store_handle),
                remote.control_key.clone(),
                SystemClock::with_offset_hours(remote.utc_offset_hours),
            )
        }
        None => {
            info!("No remote store configured, running local-only");
            (None, None, None, String::new(), SystemClock::default())
        }
    };

    let sink = CompositeSink::new(LocalSink::new(feedback), events);
    let now = tokio::time::Instant::now().into_std();
    let mut node = DoorNode::new(&config.controller, peripherals, sink, commands)
        .context("invalid controller configuration")?
        .with_clock(clock);
    node.boot(now).await;

    let console = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match Stimulus::parse(&line) {
                    Some(stimulus) => {
                        emulator::apply(stimulus, &handles, store_handle.as_ref(), &control_key)
                            .await;
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!(%line, "Unrecognized input"),
                },
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Console read failed");
                    break;
                }
            }
        }
        // Keep the devices' inputs alive after stdin closes.
        std::future::pending::<()>().await;
    });

    node.run(shutdown_signal()).await;
    console.abort();
    info!("doorward node stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
