use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulatorConfig {
    pub enabled: bool,
    pub min_interval_secs: u64,
    pub max_interval_secs: u64,
    pub swap_probability: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_interval_secs: 10,
            max_interval_secs: 25,
            swap_probability: 0.6,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimGuardConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

impl Default for SimGuardConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            history_limit: default_history_limit(),
            simulator: SimulatorConfig::default(),
        }
    }
}

fn default_history_limit() -> usize {
    200
}

pub fn load_config() -> Result<SimGuardConfig, figment::Error> {
    let figment = Figment::from(Serialized::defaults(SimGuardConfig::default()))
        .merge(Toml::file("simguard.toml"))
        .merge(Env::prefixed("SIMGUARD_"));

    let config: SimGuardConfig = figment.extract()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &SimGuardConfig) -> Result<(), figment::Error> {
    if config.history_limit == 0 {
        return Err(figment::Error::from(
            "history_limit must be nonzero".to_string(),
        ));
    }
    let sim = &config.simulator;
    if sim.min_interval_secs == 0 || sim.min_interval_secs > sim.max_interval_secs {
        return Err(figment::Error::from(
            "simulator interval bounds must be nonzero and ordered".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&sim.swap_probability) {
        return Err(figment::Error::from(
            "simulator swap_probability must be within [0, 1]".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_setup() {
        let config = SimGuardConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.history_limit, 200);
        assert!(config.simulator.enabled);
        assert_eq!(config.simulator.min_interval_secs, 10);
        assert_eq!(config.simulator.max_interval_secs, 25);
        assert!((config.simulator.swap_probability - 0.6).abs() < f64::EPSILON);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn equal_interval_bounds_are_accepted() {
        let mut config = SimGuardConfig::default();
        config.simulator.min_interval_secs = 15;
        config.simulator.max_interval_secs = 15;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn inverted_interval_bounds_fail_validation() {
        let mut config = SimGuardConfig::default();
        config.simulator.min_interval_secs = 30;
        config.simulator.max_interval_secs = 5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn zero_interval_fails_validation() {
        let mut config = SimGuardConfig::default();
        config.simulator.min_interval_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn boundary_probabilities_are_accepted() {
        let mut config = SimGuardConfig::default();
        config.simulator.swap_probability = 0.0;
        assert!(validate(&config).is_ok());
        config.simulator.swap_probability = 1.0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn out_of_range_probability_fails_validation() {
        let mut config = SimGuardConfig::default();
        config.simulator.swap_probability = 1.5;
        assert!(validate(&config).is_err());
        config.simulator.swap_probability = -0.1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn zero_history_limit_fails_validation() {
        let mut config = SimGuardConfig::default();
        config.history_limit = 0;
        assert!(validate(&config).is_err());
    }
}
