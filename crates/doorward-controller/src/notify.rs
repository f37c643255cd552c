//! Notification sinks.
//!
//! A [`NotificationSink`] receives display updates, local indications, and
//! audit events from the node. Sinks are fire-and-forget: a sink that fails
//! to deliver logs the failure itself and returns normally, so delivery never
//! changes what the controller does next.

#![allow(async_fn_in_trait)]

use doorward_core::{EventChannel, Indication};
use doorward_hardware::FeedbackDevice;
use tracing::{info, warn};

/// Destination for controller notifications.
pub trait NotificationSink: Send {
    /// Replace both display lines.
    async fn display(&mut self, primary: &str, secondary: &str);

    /// Start a local indication pattern.
    async fn indicate(&mut self, indication: Indication);

    /// Record an audit event with its wall-clock timestamp.
    async fn log_event(&mut self, channel: EventChannel, message: &str, timestamp: &str);
}

/// Sink that renders on the local feedback device.
///
/// Audit events have no local rendering; they are mirrored to `tracing` so a
/// node without a remote store still keeps a console trail.
#[derive(Debug)]
pub struct LocalSink<F> {
    device: F,
}

impl<F: FeedbackDevice> LocalSink<F> {
    pub fn new(device: F) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &F {
        &self.device
    }

    pub fn into_inner(self) -> F {
        self.device
    }
}

impl<F: FeedbackDevice> NotificationSink for LocalSink<F> {
    async fn display(&mut self, primary: &str, secondary: &str) {
        if let Err(e) = self.device.show(primary, secondary).await {
            warn!(error = %e, "Display update failed");
        }
    }

    async fn indicate(&mut self, indication: Indication) {
        if let Err(e) = self.device.indicate(indication).await {
            warn!(error = %e, ?indication, "Indication failed");
        }
    }

    async fn log_event(&mut self, channel: EventChannel, message: &str, timestamp: &str) {
        info!(%channel, time = timestamp, "{message}");
    }
}

/// Fan-out to two sinks, first then second.
#[derive(Debug)]
pub struct CompositeSink<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> CompositeSink<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: NotificationSink, B: NotificationSink> NotificationSink for CompositeSink<A, B> {
    async fn display(&mut self, primary: &str, secondary: &str) {
        self.first.display(primary, secondary).await;
        self.second.display(primary, secondary).await;
    }

    async fn indicate(&mut self, indication: Indication) {
        self.first.indicate(indication).await;
        self.second.indicate(indication).await;
    }

    async fn log_event(&mut self, channel: EventChannel, message: &str, timestamp: &str) {
        self.first.log_event(channel, message, timestamp).await;
        self.second.log_event(channel, message, timestamp).await;
    }
}

/// An absent sink drops everything.
impl<T: NotificationSink> NotificationSink for Option<T> {
    async fn display(&mut self, primary: &str, secondary: &str) {
        if let Some(sink) = self {
            sink.display(primary, secondary).await;
        }
    }

    async fn indicate(&mut self, indication: Indication) {
        if let Some(sink) = self {
            sink.indicate(indication).await;
        }
    }

    async fn log_event(&mut self, channel: EventChannel, message: &str, timestamp: &str) {
        if let Some(sink) = self {
            sink.log_event(channel, message, timestamp).await;
        }
    }
}
