//! Library root for the `simguard` crate.

// Core error handling
pub mod errors;
pub mod api_errors;

// Configuration & CLI
pub mod cli;
pub mod config_loader;

// Domain state
pub mod risk;
pub mod sim_registry;

// Web server interface
pub mod app_state;
pub mod simweb;
pub mod ws;

// Background event injection
pub mod simulator;

#[cfg(test)]
mod tests {
    pub mod web;
}

pub use app_state::AppState;
pub use sim_registry::{
    ActivityEntry, Alert, AlertLevel, RecoveryStep, RegisteredSim, SimAction, SimCard,
    SimRegistry, Snapshot, StatePayload,
};
pub use ws::WsEvent;
