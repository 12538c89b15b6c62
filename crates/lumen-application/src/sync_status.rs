//! Custom tracing layer for streaming sync-health events to the frontend.
//!
//! Background sync failures never interrupt the user; their only surface is
//! a passive status indicator. This layer captures `remote_sync`-target
//! warnings and errors and forwards them over a channel the UI consumes.

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Event data sent to the frontend status indicator.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SyncStatusEvent {
    /// Log level (WARN, ERROR)
    pub level: String,
    /// Human-readable message
    pub message: String,
    /// Timestamp
    pub timestamp: String,
}

/// A tracing layer that sends remote-sync trouble to a channel.
pub struct SyncStatusLayer {
    sender: mpsc::UnboundedSender<SyncStatusEvent>,
}

impl SyncStatusLayer {
    /// Create a new layer with the given channel sender.
    pub fn new(sender: mpsc::UnboundedSender<SyncStatusEvent>) -> Self {
        Self { sender }
    }

    /// Create a layer together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SyncStatusEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl<S> Layer<S> for SyncStatusLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != "remote_sync" {
            return;
        }
        if *event.metadata().level() > Level::WARN {
            return;
        }

        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);

        let _ = self.sender.send(SyncStatusEvent {
            level: event.metadata().level().to_string(),
            message: visitor.0,
            timestamp: Utc::now().to_rfc3339(),
        });
    }
}

/// Extracts the `message` field from an event.
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}
