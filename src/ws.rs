//! WebSocket push channel for the dashboard.
//!
//! On connect the client gets an `init` frame carrying the full state
//! snapshot, then a stream of `alert` and `state` frames as the registry
//! changes. Frames sent by the client are treated as keepalives.

use std::sync::Arc;

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;

use crate::app_state::AppState;
use crate::sim_registry::{Alert, Snapshot, StatePayload};

/// Envelope for every frame the server pushes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum WsEvent {
    Init(Snapshot),
    Alert(Alert),
    State(StatePayload),
}

pub async fn ws_handler(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| client_session(socket, state))
}

async fn client_session(mut socket: WebSocket, state: Arc<AppState>) {
    let init = {
        let registry = state.registry.read().await;
        WsEvent::Init(registry.snapshot())
    };
    if send_event(&mut socket, &init).await.is_err() {
        return;
    }

    let mut events = state.subscribe();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "websocket subscriber lagged, frames dropped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                // Client frames are keepalive pings only.
                Some(Ok(_)) => {}
                Some(Err(_)) | None => break,
            },
        }
    }
    tracing::debug!("websocket client disconnected");
}

async fn send_event(socket: &mut WebSocket, event: &WsEvent) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(err) => {
            tracing::error!(%err, "failed to serialize websocket event");
            return Ok(());
        }
    };
    socket.send(Message::Text(text.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim_registry::SimRegistry;

    #[test]
    fn init_frame_uses_tagged_envelope() {
        let registry = SimRegistry::seeded(200);
        let value = serde_json::to_value(WsEvent::Init(registry.snapshot())).unwrap();
        assert_eq!(value["type"], "init");
        assert_eq!(value["payload"]["sims"].as_array().unwrap().len(), 3);
        assert!(value["payload"]["alerts"].is_array());
    }

    #[test]
    fn state_frame_carries_sims_and_registrations_only() {
        let registry = SimRegistry::seeded(200);
        let value = serde_json::to_value(WsEvent::State(registry.state_payload())).unwrap();
        assert_eq!(value["type"], "state");
        assert!(value["payload"].get("alerts").is_none());
        assert_eq!(value["payload"]["registered"].as_array().unwrap().len(), 3);
    }
}
