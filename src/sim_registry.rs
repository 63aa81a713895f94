//! In-memory registry of SIM cards, observed registrations, alerts, and
//! activity. This is the demo datastore: state lives for the lifetime of
//! the process, newest entries first, bounded history.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SimGuardError, SimGuardResult};
use crate::risk::RiskLevel;

/// A SIM card under the subscriber's control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimCard {
    pub id: String,
    pub number: String,
    pub locked: bool,
    /// Free-text status line shown on the dashboard.
    pub last: String,
}

/// A SIM-card registration observed against the subscriber's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredSim {
    pub id: String,
    pub number: String,
    pub relation: String,
    pub risk: RiskLevel,
}

/// Severity of an alert pushed to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warn,
    Danger,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub text: String,
    pub level: AlertLevel,
}

/// One line of the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub text: String,
}

/// Full clone of the registry state, as served by `GET /sims` and the
/// WebSocket `init` frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub sims: Vec<SimCard>,
    pub registered: Vec<RegisteredSim>,
    pub alerts: Vec<Alert>,
    pub activity: Vec<ActivityEntry>,
}

/// The SIM/registration slice of the state, pushed when the simulator
/// adds rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatePayload {
    pub sims: Vec<SimCard>,
    pub registered: Vec<RegisteredSim>,
}

/// Manual action against a SIM card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimAction {
    Lock,
    Unlock,
}

impl SimAction {
    pub fn status_label(self) -> &'static str {
        match self {
            SimAction::Lock => "locked",
            SimAction::Unlock => "unlocked",
        }
    }
}

/// One step of the guided recovery workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryStep {
    Freeze,
    Reset,
    NotifyBank,
    OpenCase,
    Police,
}

pub struct SimRegistry {
    sims: Vec<SimCard>,
    registered: Vec<RegisteredSim>,
    alerts: Vec<Alert>,
    activity: Vec<ActivityEntry>,
    history_limit: usize,
}

impl SimRegistry {
    /// Build a registry pre-populated with the demo fixture.
    pub fn seeded(history_limit: usize) -> Self {
        let mut registry = Self {
            sims: vec![
                SimCard {
                    id: "sim-0825550101".into(),
                    number: "082 555 0101".into(),
                    locked: true,
                    last: "No issues in 12h".into(),
                },
                SimCard {
                    id: "sim-0825550102".into(),
                    number: "082 555 0102".into(),
                    locked: false,
                    last: "Unlocked by user 2h ago".into(),
                },
                SimCard {
                    id: "sim-0812227788".into(),
                    number: "081 222 7788".into(),
                    locked: true,
                    last: "Auto-locked on risk spike".into(),
                },
            ],
            registered: vec![
                RegisteredSim {
                    id: "reg-0601239999".into(),
                    number: "060 123 9999".into(),
                    relation: "Unknown".into(),
                    risk: RiskLevel::High,
                },
                RegisteredSim {
                    id: "reg-0724001100".into(),
                    number: "072 400 1100".into(),
                    relation: "Old device".into(),
                    risk: RiskLevel::Medium,
                },
                RegisteredSim {
                    id: "reg-0825550102".into(),
                    number: "082 555 0102".into(),
                    relation: "Primary".into(),
                    risk: RiskLevel::Low,
                },
            ],
            alerts: Vec::new(),
            activity: Vec::new(),
            history_limit,
        };
        registry.record_alert("System ready. Monitoring enabled.", AlertLevel::Info);
        registry
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            sims: self.sims.clone(),
            registered: self.registered.clone(),
            alerts: self.alerts.clone(),
            activity: self.activity.clone(),
        }
    }

    pub fn state_payload(&self) -> StatePayload {
        StatePayload {
            sims: self.sims.clone(),
            registered: self.registered.clone(),
        }
    }

    pub fn sim_count(&self) -> usize {
        self.sims.len()
    }

    pub fn find_sim(&self, sim_id: &str) -> Option<&SimCard> {
        self.sims.iter().find(|sim| sim.id == sim_id)
    }

    fn find_sim_mut(&mut self, sim_id: &str) -> Option<&mut SimCard> {
        self.sims.iter_mut().find(|sim| sim.id == sim_id)
    }

    /// Prepend an audit-trail line, keeping the history bounded.
    pub fn record_activity(&mut self, text: impl Into<String>) {
        self.activity.insert(
            0,
            ActivityEntry {
                id: Uuid::new_v4(),
                ts: Utc::now(),
                text: text.into(),
            },
        );
        self.activity.truncate(self.history_limit);
    }

    /// Prepend an alert, keeping the history bounded. Returns the alert
    /// so callers can broadcast it.
    pub fn record_alert(&mut self, text: impl Into<String>, level: AlertLevel) -> Alert {
        let alert = Alert {
            id: Uuid::new_v4(),
            ts: Utc::now(),
            text: text.into(),
            level,
        };
        self.alerts.insert(0, alert.clone());
        self.alerts.truncate(self.history_limit);
        alert
    }

    /// Apply a manual lock/unlock. Returns the updated card and the alert
    /// recorded for it.
    pub fn apply_action(
        &mut self,
        sim_id: &str,
        action: SimAction,
    ) -> SimGuardResult<(SimCard, Alert)> {
        let now = Utc::now().to_rfc3339();
        let sim = self
            .find_sim_mut(sim_id)
            .ok_or_else(|| SimGuardError::not_found("sim", sim_id))?;

        let (number, alert_text, level) = match action {
            SimAction::Lock => {
                sim.locked = true;
                sim.last = format!("Locked by user \u{2022} {now}");
                (
                    sim.number.clone(),
                    format!("SIM {} locked by user", sim.number),
                    AlertLevel::Info,
                )
            }
            SimAction::Unlock => {
                sim.locked = false;
                sim.last = format!("Unlocked by user \u{2022} {now}");
                (
                    sim.number.clone(),
                    format!("SIM {} unlocked by user", sim.number),
                    AlertLevel::Warn,
                )
            }
        };
        let updated = sim.clone();

        self.record_activity(format!("{number} {} via API", action.status_label()));
        let alert = self.record_alert(alert_text, level);
        Ok((updated, alert))
    }

    /// Execute one recovery-wizard step. Freeze also locks the card; the
    /// other steps only produce alerts and audit lines.
    pub fn apply_recovery<R: Rng + ?Sized>(
        &mut self,
        sim_id: &str,
        step: RecoveryStep,
        rng: &mut R,
    ) -> SimGuardResult<Alert> {
        let number = {
            let sim = self
                .find_sim_mut(sim_id)
                .ok_or_else(|| SimGuardError::not_found("sim", sim_id))?;
            if step == RecoveryStep::Freeze {
                sim.locked = true;
            }
            sim.number.clone()
        };

        let alert = match step {
            RecoveryStep::Freeze => {
                self.record_activity(format!("Recovery freeze for {number}"));
                self.record_alert(
                    format!("Recovery: SIM {number} frozen via wizard"),
                    AlertLevel::Info,
                )
            }
            RecoveryStep::Reset => {
                self.record_activity(format!("Recovery reset triggered for {number}"));
                self.record_alert(
                    format!("Recovery: password reset initiated for {number}"),
                    AlertLevel::Warn,
                )
            }
            RecoveryStep::NotifyBank => {
                self.record_activity(format!("Recovery notify-bank for {number}"));
                self.record_alert(
                    format!("Recovery: bank partners notified for {number}"),
                    AlertLevel::Warn,
                )
            }
            RecoveryStep::OpenCase => {
                let case_ref: u32 = rng.random_range(10_000..=99_999);
                self.record_activity(format!("Recovery open-case for {number} ref {case_ref}"));
                self.record_alert(
                    format!("Recovery: Telco case opened for {number} (Ref #{case_ref})"),
                    AlertLevel::Danger,
                )
            }
            RecoveryStep::Police => {
                self.record_activity(format!("Recovery police note for {number}"));
                self.record_alert(
                    format!("Recovery: SAPS note generated for {number}"),
                    AlertLevel::Danger,
                )
            }
        };
        Ok(alert)
    }

    /// Record a simulated SIM-swap attempt against the card at `index`.
    /// Unlocked cards are auto-locked and a second, escalated alert is
    /// produced. Returns the alerts to broadcast, newest last.
    pub fn observe_swap_attempt(&mut self, index: usize) -> Vec<Alert> {
        let Some(sim) = self.sims.get(index) else {
            return Vec::new();
        };
        let number = sim.number.clone();
        let was_locked = sim.locked;

        self.record_activity(format!("Suspicious SIM-swap attempt detected for {number}"));
        let mut alerts = vec![self.record_alert(
            format!("\u{26a0}\u{fe0f} Suspicious SIM-swap attempt detected for {number}"),
            AlertLevel::Warn,
        )];

        if !was_locked {
            let now = Utc::now().to_rfc3339();
            if let Some(sim) = self.sims.get_mut(index) {
                sim.locked = true;
                sim.last = format!("Auto-locked on risk \u{2022} {now}");
            }
            self.record_activity(format!("{number} auto-locked due to risk"));
            alerts.push(self.record_alert(
                format!("Auto-locked {number} due to high risk"),
                AlertLevel::Danger,
            ));
        }
        alerts
    }

    /// Record a registration of `number` against the subscriber's identity
    /// at a remote ISP, auto-freezing a matching local card. Returns the
    /// danger alert to broadcast.
    pub fn observe_remote_registration(&mut self, number: String, risk: RiskLevel) -> Alert {
        let reg_id = format!("reg-{}", &Uuid::new_v4().to_string()[..8]);
        self.registered.insert(
            0,
            RegisteredSim {
                id: reg_id,
                number: number.clone(),
                relation: "Unknown".into(),
                risk,
            },
        );
        self.record_activity(format!(
            "New SIM {number} registered to your ID on remote ISP"
        ));
        let alert = self.record_alert(
            format!("New SIM {number} registered to your ID \u{2014} auto-frozen pending review"),
            AlertLevel::Danger,
        );

        let now = Utc::now().to_rfc3339();
        self.sims.insert(
            0,
            SimCard {
                id: Uuid::new_v4().to_string(),
                number: number.clone(),
                locked: true,
                last: format!("Auto-locked on registration \u{2022} {now}"),
            },
        );
        self.record_activity(format!("Auto-added and locked {number} to local SIM list"));
        alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn registry() -> SimRegistry {
        SimRegistry::seeded(200)
    }

    #[test]
    fn seeded_fixture_shape() {
        let reg = registry();
        let snap = reg.snapshot();
        assert_eq!(snap.sims.len(), 3);
        assert_eq!(snap.registered.len(), 3);
        assert_eq!(snap.alerts.len(), 1);
        assert_eq!(snap.alerts[0].level, AlertLevel::Info);
        assert!(snap.activity.is_empty());
    }

    #[test]
    fn history_is_bounded_and_newest_first() {
        let mut reg = SimRegistry::seeded(3);
        for i in 0..5 {
            reg.record_alert(format!("alert {i}"), AlertLevel::Warn);
            reg.record_activity(format!("activity {i}"));
        }
        let snap = reg.snapshot();
        assert_eq!(snap.alerts.len(), 3);
        assert_eq!(snap.activity.len(), 3);
        assert_eq!(snap.alerts[0].text, "alert 4");
        assert_eq!(snap.activity[0].text, "activity 4");
    }

    #[test]
    fn lock_action_updates_card_and_records() {
        let mut reg = registry();
        let (sim, alert) = reg
            .apply_action("sim-0825550102", SimAction::Lock)
            .expect("known sim");
        assert!(sim.locked);
        assert!(sim.last.starts_with("Locked by user"));
        assert_eq!(alert.level, AlertLevel::Info);
        assert!(alert.text.contains("locked by user"));
        assert_eq!(reg.snapshot().activity.len(), 1);
    }

    #[test]
    fn unlock_alert_is_warn() {
        let mut reg = registry();
        let (sim, alert) = reg
            .apply_action("sim-0825550101", SimAction::Unlock)
            .expect("known sim");
        assert!(!sim.locked);
        assert_eq!(alert.level, AlertLevel::Warn);
    }

    #[test]
    fn unknown_sim_is_an_error() {
        let mut reg = registry();
        let err = reg.apply_action("sim-nope", SimAction::Lock).unwrap_err();
        assert!(err.to_string().contains("sim-nope"));
    }

    #[test]
    fn recovery_freeze_locks_card() {
        let mut reg = registry();
        let mut rng = StdRng::seed_from_u64(7);
        let alert = reg
            .apply_recovery("sim-0825550102", RecoveryStep::Freeze, &mut rng)
            .expect("known sim");
        assert_eq!(alert.level, AlertLevel::Info);
        assert!(reg.find_sim("sim-0825550102").unwrap().locked);
    }

    #[test]
    fn recovery_open_case_allocates_five_digit_ref() {
        let mut reg = registry();
        let mut rng = StdRng::seed_from_u64(7);
        let alert = reg
            .apply_recovery("sim-0825550101", RecoveryStep::OpenCase, &mut rng)
            .expect("known sim");
        assert_eq!(alert.level, AlertLevel::Danger);
        assert!(alert.text.contains("Ref #"));
    }

    #[test]
    fn swap_attempt_auto_locks_unlocked_card() {
        let mut reg = registry();
        // index 1 is the unlocked seed card
        let alerts = reg.observe_swap_attempt(1);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[1].level, AlertLevel::Danger);
        assert!(reg.find_sim("sim-0825550102").unwrap().locked);
    }

    #[test]
    fn swap_attempt_on_locked_card_only_warns() {
        let mut reg = registry();
        let alerts = reg.observe_swap_attempt(0);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Warn);
    }

    #[test]
    fn remote_registration_adds_frozen_card() {
        let mut reg = registry();
        let alert = reg.observe_remote_registration("07123456789".into(), RiskLevel::High);
        assert_eq!(alert.level, AlertLevel::Danger);
        let snap = reg.snapshot();
        assert_eq!(snap.sims.len(), 4);
        assert_eq!(snap.registered.len(), 4);
        assert!(snap.sims[0].locked);
        assert_eq!(snap.registered[0].relation, "Unknown");
    }

    #[test]
    fn recovery_step_wire_names_are_kebab_case() {
        assert_eq!(
            serde_json::from_str::<RecoveryStep>("\"notify-bank\"").unwrap(),
            RecoveryStep::NotifyBank
        );
        assert_eq!(
            serde_json::to_string(&RecoveryStep::OpenCase).unwrap(),
            "\"open-case\""
        );
    }
}
