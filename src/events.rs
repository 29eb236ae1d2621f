//! Application event broadcast.

use tokio::sync::broadcast;
use tracing::debug;

const EVENT_CAPACITY: usize = 64;

/// Events broadcast to any interested listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Every feature module reported ready.
    Ready,
    /// The router dispatched a navigation.
    RouteChanged { route: String },
    /// The registrar gave up; these views never became navigable.
    RegistrationAbandoned { missing: Vec<String> },
}

/// Cloneable handle to the broadcast channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    #[allow(dead_code)]
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    /// Broadcast an event. Having no listeners is not an error.
    pub fn emit(&self, event: AppEvent) {
        debug!("Event: {:?}", event);
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
