//! REST surface of the SIMGuard backend.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::api_errors::AppError;
use crate::app_state::AppState;
use crate::risk::RiskLevel;
use crate::sim_registry::{RecoveryStep, SimAction, SimCard, Snapshot};
use crate::ws::WsEvent;

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionRequest {
    pub sim_id: String,
    pub action: SimAction,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: String,
    pub sim: SimCard,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecoveryRequest {
    pub sim_id: String,
    pub step: RecoveryStep,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecoveryResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RiskResponse {
    pub sim_id: String,
    pub risk: String,
}

/// Build the full application router: REST endpoints, `/api` aliases,
/// WebSocket upgrade, health probes, and the permissive demo CORS layer
/// (the frontend is served from a different origin).
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // current endpoints
        .route("/sims", get(get_sims))
        .route("/action", post(take_action))
        .route("/recovery", post(run_recovery))
        .route("/risk/{sim_id}", get(risk_score))
        // aliases kept for frontend builds that prefix with /api
        .route("/api/sims", get(get_sims))
        .route("/api/action", post(take_action))
        .route("/api/recovery", post(run_recovery))
        .route("/api/risk/{sim_id}", get(risk_score))
        // live push
        .route("/ws", get(crate::ws::ws_handler))
        // health endpoints
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[axum::debug_handler]
async fn get_sims(State(state): State<Arc<AppState>>) -> Json<Snapshot> {
    let registry = state.registry.read().await;
    Json(registry.snapshot())
}

#[axum::debug_handler]
async fn take_action(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ActionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let (sim, alert) = {
        let mut registry = state.registry.write().await;
        registry.apply_action(&req.sim_id, req.action)?
    };
    tracing::info!(sim_id = %req.sim_id, action = ?req.action, "manual action applied");
    state.publish(WsEvent::Alert(alert));
    Ok(Json(ActionResponse {
        status: req.action.status_label().to_string(),
        sim,
    }))
}

#[axum::debug_handler]
async fn run_recovery(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecoveryRequest>,
) -> Result<Json<RecoveryResponse>, AppError> {
    let alert = {
        let mut registry = state.registry.write().await;
        registry.apply_recovery(&req.sim_id, req.step, &mut rand::rng())?
    };
    tracing::info!(sim_id = %req.sim_id, step = ?req.step, "recovery step executed");
    state.publish(WsEvent::Alert(alert));
    Ok(Json(RecoveryResponse { ok: true }))
}

#[axum::debug_handler]
async fn risk_score(
    State(state): State<Arc<AppState>>,
    Path(sim_id): Path<String>,
) -> Result<Json<RiskResponse>, AppError> {
    {
        let registry = state.registry.read().await;
        if registry.find_sim(&sim_id).is_none() {
            return Err(AppError::not_found(format!("sim '{sim_id}' not found")));
        }
    }
    let risk = RiskLevel::weighted_sample(&mut rand::rng());
    Ok(Json(RiskResponse {
        sim_id,
        risk: risk.label().to_string(),
    }))
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn readyz(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let registry = state.registry.read().await;
    Json(serde_json::json!({ "ready": registry.sim_count() > 0 }))
}
