//! Remote link: sign-in handshake, command reads, and event pushes.
//!
//! [`RemoteLink::connect`] performs the boot-time handshake. When sign-in
//! fails the link is kept in local-only mode: the command half reports itself
//! unavailable and the event half drops records, so the node runs the same
//! either way.

use doorward_controller::{NotificationSink, RemoteCommandSource};
use doorward_core::{DoorCommand, EventChannel, Indication, RemoteConfig};
use tracing::{debug, info, warn};

use crate::{EventRecord, RealtimeStore, Result};

/// Connection to a realtime store, before being split for use.
#[derive(Debug)]
pub struct RemoteLink<S> {
    store: S,
    control_key: String,
    events_root: String,
    online: bool,
}

impl<S: RealtimeStore + Clone> RemoteLink<S> {
    /// Sign in to `store`. A failed sign-in yields a local-only link.
    pub async fn connect(mut store: S, config: &RemoteConfig) -> Self {
        info!(url = %config.database_url, "Signing in to remote store");
        let online = match store.sign_in().await {
            Ok(()) => {
                info!("Remote store sign-in succeeded");
                true
            }
            Err(e) => {
                warn!(error = %e, "Remote store sign-in failed, continuing local-only");
                false
            }
        };

        Self {
            store,
            control_key: config.control_key.clone(),
            events_root: config.events_root.trim_end_matches('/').to_string(),
            online,
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Split into the command reader and the event pusher.
    pub fn split(self) -> (RemoteCommands<S>, RemoteEvents<S>) {
        let commands = RemoteCommands {
            store: self.store.clone(),
            control_key: self.control_key,
            online: self.online,
            last_value: None,
        };
        let events = RemoteEvents {
            store: self.store,
            events_root: self.events_root,
            online: self.online,
        };
        (commands, events)
    }
}

/// Reads the control key.
///
/// `open` and `close` are level-triggered. `reset` is an acknowledgment and
/// fires once per write: the key is never cleared by the node, so a value
/// left in place must not acknowledge later alarms. Writing `reset` again
/// takes a different value (or an empty key) in between.
#[derive(Debug)]
pub struct RemoteCommands<S> {
    store: S,
    control_key: String,
    online: bool,
    last_value: Option<String>,
}

impl<S: RealtimeStore> RemoteCommandSource for RemoteCommands<S> {
    async fn read_command(&mut self) -> Option<DoorCommand> {
        if !self.online {
            return None;
        }
        match self.store.get_string(&self.control_key).await {
            Ok(Some(value)) => {
                let command = DoorCommand::from_value(&value);
                if command.is_none() {
                    debug!(key = %self.control_key, %value, "Ignoring unknown control value");
                }
                let unchanged = self.last_value.as_deref() == Some(value.as_str());
                self.last_value = Some(value);
                match command {
                    Some(DoorCommand::Reset) if unchanged => None,
                    other => other,
                }
            }
            Ok(None) => {
                self.last_value = None;
                None
            }
            Err(e) => {
                warn!(error = %e, key = %self.control_key, "Control key read failed");
                None
            }
        }
    }

    fn is_available(&self) -> bool {
        self.online
    }
}

/// Pushes audit events under `<events_root>/<channel>`.
///
/// Display and indication updates have no remote rendering and are ignored.
#[derive(Debug)]
pub struct RemoteEvents<S> {
    store: S,
    events_root: String,
    online: bool,
}

impl<S: RealtimeStore> RemoteEvents<S> {
    pub fn channel_path(&self, channel: EventChannel) -> String {
        format!("{}/{}", self.events_root, channel)
    }

    async fn deliver(&mut self, channel: EventChannel, record: &EventRecord) -> Result<()> {
        let path = self.channel_path(channel);
        self.store.push(&path, record.to_value()?).await
    }
}

impl<S: RealtimeStore> NotificationSink for RemoteEvents<S> {
    async fn display(&mut self, _primary: &str, _secondary: &str) {}

    async fn indicate(&mut self, _indication: Indication) {}

    async fn log_event(&mut self, channel: EventChannel, message: &str, timestamp: &str) {
        if !self.online {
            return;
        }
        let record = EventRecord::new(message, timestamp);
        if let Err(e) = self.deliver(channel, &record).await {
            warn!(error = %e, %channel, "Event delivery failed, dropping record");
        }
    }
}
