//! Runtime for a single-door access node.
//!
//! Wires peripherals, the access controller, local and remote notification
//! sinks, and the remote command channel into one tick loop.
//!
//! ```no_run
//! use doorward_controller::LocalSink;
//! use doorward_core::NodeConfig;
//! use doorward_hardware::mock::MockFeedback;
//! use doorward_node::{DoorNode, emulated_peripherals};
//! use doorward_remote::RemoteCommands;
//! use doorward_remote::MemoryStore;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = NodeConfig::load_from_env()?;
//! let (peripherals, _handles) = emulated_peripherals();
//! let (feedback, _display) = MockFeedback::new();
//!
//! let now = tokio::time::Instant::now().into_std();
//! let remote: Option<RemoteCommands<MemoryStore>> = None;
//! let mut node = DoorNode::new(&config.controller, peripherals, LocalSink::new(feedback), remote)?;
//! node.boot(now).await;
//! node.run(async { let _ = tokio::signal::ctrl_c().await; }).await;
//! # Ok(())
//! # }
//! ```

pub mod emulator;
pub mod logging;
pub mod node;

pub use emulator::{EmulatedPeripherals, EmulatorHandles, Stimulus, emulated_peripherals};
pub use logging::init_tracing;
pub use node::{DoorNode, Peripherals};
