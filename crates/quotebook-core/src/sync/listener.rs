//! Sync notifications delivered to the presentation layer.

use tokio::sync::mpsc::UnboundedSender;

/// Outcome notification emitted once per cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Succeeded { message: String, quote_count: usize },
    Failed { message: String },
}

impl SyncEvent {
    pub fn message(&self) -> &str {
        match self {
            Self::Succeeded { message, .. } | Self::Failed { message } => message,
        }
    }
}

/// Receives sync notifications.
///
/// Called inline by the engine, so implementations should return quickly.
pub trait SyncListener: Send + Sync {
    fn on_sync_event(&self, event: &SyncEvent);
}

/// Forward events over a channel; a closed channel is ignored.
impl SyncListener for UnboundedSender<SyncEvent> {
    fn on_sync_event(&self, event: &SyncEvent) {
        if self.send(event.clone()).is_err() {
            tracing::debug!("Sync event receiver dropped");
        }
    }
}
