//! Realtime key-value store contract and an in-memory implementation.
//!
//! The node needs three things from the store: a sign-in handshake, reading
//! one string value by path, and appending a record under a path. Concrete
//! transports implement [`RealtimeStore`]; [`MemoryStore`] keeps everything
//! in process for the emulator and tests.

#![allow(async_fn_in_trait)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, trace};

use crate::{RemoteError, Result};

/// Hierarchical key-value store with append-only lists.
pub trait RealtimeStore: Send {
    /// Authenticate the node. Reads and pushes fail until this succeeds.
    async fn sign_in(&mut self) -> Result<()>;

    /// String value at `path`, `None` if unset or not a string.
    async fn get_string(&mut self, path: &str) -> Result<Option<String>>;

    /// Append `value` to the list at `path`.
    async fn push(&mut self, path: &str, value: Value) -> Result<()>;
}

#[derive(Debug, Default)]
struct MemoryState {
    values: HashMap<String, Value>,
    lists: HashMap<String, Vec<Value>>,
    signed_in: bool,
    sign_ins: usize,
    reject_sign_in: bool,
    reads_fail: bool,
    pushes_fail: bool,
}

fn lock(state: &Mutex<MemoryState>) -> MutexGuard<'_, MemoryState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-process realtime store.
///
/// Clones share the same data, so one store can back both halves of a
/// [`RemoteLink`](crate::RemoteLink).
///
/// # Examples
///
/// ```
/// use doorward_remote::{MemoryStore, RealtimeStore};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> doorward_remote::Result<()> {
///     let (mut store, handle) = MemoryStore::new();
///     handle.set_value("control/doorCommand", "open");
///
///     store.sign_in().await?;
///     let value = store.get_string("control/doorCommand").await?;
///     assert_eq!(value.as_deref(), Some("open"));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store and its control handle.
    pub fn new() -> (Self, MemoryStoreHandle) {
        let state = Arc::new(Mutex::new(MemoryState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MemoryStoreHandle { state },
        )
    }
}

impl RealtimeStore for MemoryStore {
    async fn sign_in(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.sign_ins += 1;
        if state.reject_sign_in {
            return Err(RemoteError::authentication("credentials rejected"));
        }
        state.signed_in = true;
        debug!("Memory store sign-in accepted");
        Ok(())
    }

    async fn get_string(&mut self, path: &str) -> Result<Option<String>> {
        let state = lock(&self.state);
        if !state.signed_in {
            return Err(RemoteError::NotSignedIn);
        }
        if state.reads_fail {
            return Err(RemoteError::transport("read failed"));
        }
        let value = state
            .values
            .get(path)
            .and_then(Value::as_str)
            .map(str::to_string);
        trace!(path, ?value, "Memory store read");
        Ok(value)
    }

    async fn push(&mut self, path: &str, value: Value) -> Result<()> {
        let mut state = lock(&self.state);
        if !state.signed_in {
            return Err(RemoteError::NotSignedIn);
        }
        if state.pushes_fail {
            return Err(RemoteError::transport("push failed"));
        }
        trace!(path, %value, "Memory store push");
        state.lists.entry(path.to_string()).or_default().push(value);
        Ok(())
    }
}

/// Handle for inspecting and steering a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryStoreHandle {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStoreHandle {
    /// Set a string value, as an operator writing the control key would.
    pub fn set_value(&self, path: &str, value: &str) {
        lock(&self.state)
            .values
            .insert(path.to_string(), Value::String(value.to_string()));
    }

    /// Set an arbitrary JSON value.
    pub fn set_json(&self, path: &str, value: Value) {
        lock(&self.state).values.insert(path.to_string(), value);
    }

    pub fn clear_value(&self, path: &str) {
        lock(&self.state).values.remove(path);
    }

    /// Records pushed under `path`, oldest first.
    pub fn pushed(&self, path: &str) -> Vec<Value> {
        lock(&self.state).lists.get(path).cloned().unwrap_or_default()
    }

    /// Paths that have received at least one push.
    pub fn pushed_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = lock(&self.state).lists.keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn reject_sign_in(&self, reject: bool) {
        lock(&self.state).reject_sign_in = reject;
    }

    pub fn fail_reads(&self, fail: bool) {
        lock(&self.state).reads_fail = fail;
    }

    pub fn fail_pushes(&self, fail: bool) {
        lock(&self.state).pushes_fail = fail;
    }

    pub fn is_signed_in(&self) -> bool {
        lock(&self.state).signed_in
    }

    pub fn sign_in_count(&self) -> usize {
        lock(&self.state).sign_ins
    }
}
