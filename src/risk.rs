//! Risk classification for SIM registrations.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Risk level attached to a SIM registration or returned by the
/// scoring endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Human-facing label, as the dashboard renders it.
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Demo scoring heuristic: 60% low, 30% medium, 10% high.
    pub fn weighted_sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll = rng.random_range(0..100u32);
        if roll < 60 {
            RiskLevel::Low
        } else if roll < 90 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Uniform draw, used when the simulator fabricates a registration.
    pub fn uniform_sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..3u32) {
            0 => RiskLevel::Low,
            1 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
