//! Remote realtime store link for the door node.
//!
//! The node optionally talks to a hierarchical key-value store: it reads an
//! operator command from one control key and appends audit records under
//! per-channel lists. Everything here is best-effort. A failed sign-in, read,
//! or push is logged and the node carries on locally.
//!
//! - [`RealtimeStore`]: transport contract (sign-in, read a string, push)
//! - [`MemoryStore`]: in-process store with a control handle
//! - [`RemoteLink`]: boot handshake, split into [`RemoteCommands`] and
//!   [`RemoteEvents`]
//! - [`EventRecord`]: `{message, time}` wire record

pub mod error;
pub mod link;
pub mod record;
pub mod store;

pub use error::{RemoteError, Result};
pub use link::{RemoteCommands, RemoteEvents, RemoteLink};
pub use record::EventRecord;
pub use store::{MemoryStore, MemoryStoreHandle, RealtimeStore};
