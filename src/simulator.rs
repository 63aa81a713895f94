//! Background event simulator.
//!
//! Periodically injects the two demo scenarios: a SIM-swap attempt
//! against a known card, or a fresh registration of the subscriber's
//! identity at a remote ISP (auto-frozen on sight). Every injected event
//! is broadcast to WebSocket subscribers.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::app_state::AppState;
use crate::risk::RiskLevel;
use crate::ws::WsEvent;

pub fn spawn(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run(state))
}

async fn run(state: Arc<AppState>) {
    let simulator = state.config.simulator.clone();
    tracing::info!(
        min = simulator.min_interval_secs,
        max = simulator.max_interval_secs,
        "event simulator started"
    );
    loop {
        let wait = rand::rng()
            .random_range(simulator.min_interval_secs..=simulator.max_interval_secs);
        tokio::time::sleep(Duration::from_secs(wait)).await;

        if rand::rng().random_bool(simulator.swap_probability) {
            inject_swap_attempt(&state).await;
        } else {
            inject_remote_registration(&state).await;
        }
    }
}

async fn inject_swap_attempt(state: &AppState) {
    let index = {
        let registry = state.registry.read().await;
        let count = registry.sim_count();
        if count == 0 {
            return;
        }
        rand::rng().random_range(0..count)
    };
    let alerts = {
        let mut registry = state.registry.write().await;
        registry.observe_swap_attempt(index)
    };
    tracing::warn!(alerts = alerts.len(), "simulated SIM-swap attempt");
    for alert in alerts {
        state.publish(WsEvent::Alert(alert));
    }
}

async fn inject_remote_registration(state: &AppState) {
    let number = format!("07{}", rand::rng().random_range(100_000_000u64..=999_999_999));
    let risk = RiskLevel::uniform_sample(&mut rand::rng());
    let (alert, payload) = {
        let mut registry = state.registry.write().await;
        let alert = registry.observe_remote_registration(number.clone(), risk);
        (alert, registry.state_payload())
    };
    tracing::warn!(%number, ?risk, "simulated remote SIM registration");
    state.publish(WsEvent::Alert(alert));
    state.publish(WsEvent::State(payload));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_loader::SimGuardConfig;

    #[tokio::test]
    async fn swap_attempt_publishes_alerts() {
        let state = Arc::new(AppState::new(SimGuardConfig::default()));
        let mut events = state.subscribe();

        inject_swap_attempt(&state).await;

        // At least the warn alert; a second danger alert when the card
        // picked happened to be unlocked.
        match events.try_recv().expect("an alert should be broadcast") {
            WsEvent::Alert(alert) => assert!(alert.text.contains("SIM-swap attempt")),
            other => panic!("expected alert frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn remote_registration_publishes_alert_then_state() {
        let state = Arc::new(AppState::new(SimGuardConfig::default()));
        let mut events = state.subscribe();

        inject_remote_registration(&state).await;

        assert!(matches!(events.try_recv().unwrap(), WsEvent::Alert(_)));
        match events.try_recv().unwrap() {
            WsEvent::State(payload) => {
                assert_eq!(payload.sims.len(), 4);
                assert_eq!(payload.registered.len(), 4);
            }
            other => panic!("expected state frame, got {other:?}"),
        }
        let registry = state.registry.read().await;
        assert!(registry.snapshot().sims[0].locked);
    }
}
