use tokio::sync::{RwLock, broadcast};

use crate::config_loader::SimGuardConfig;
use crate::sim_registry::SimRegistry;
use crate::ws::WsEvent;

/// Shared service state: the in-memory registry plus the broadcast
/// channel feeding WebSocket subscribers.
pub struct AppState {
    pub config: SimGuardConfig,
    pub registry: RwLock<SimRegistry>,
    events: broadcast::Sender<WsEvent>,
}

const EVENT_CHANNEL_CAPACITY: usize = 64;

impl AppState {
    pub fn new(config: SimGuardConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let registry = SimRegistry::seeded(config.history_limit);
        Self {
            config,
            registry: RwLock::new(registry),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WsEvent> {
        self.events.subscribe()
    }

    /// Fan an event out to all connected WebSocket clients. A send error
    /// only means nobody is listening.
    pub fn publish(&self, event: WsEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("event dropped: no websocket subscribers");
        }
    }
}
