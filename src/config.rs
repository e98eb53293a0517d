//! Configuration for instance generation and solving.
//!
//! All structs deserialize from JSON with every field optional; missing
//! fields take the defaults of the interactive demo (10 customers on a
//! 100×100 grid, demands 5..=20, capacity 120, 3 vehicles, 15 s).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// Solver parameters shared by the exact and heuristic solvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Vehicle capacity `Q`.
    pub capacity: i32,
    /// Maximum number of vehicles `K` (exact solver only).
    pub max_vehicles: usize,
    /// Wall-clock budget of the exact solver, in seconds.
    pub time_limit_secs: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            capacity: 120,
            max_vehicles: 3,
            time_limit_secs: 15.0,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity <= 0 {
            return Err(RoutingError::invalid_parameter(format!(
                "capacity must be positive, got {}",
                self.capacity
            )));
        }
        if self.max_vehicles == 0 {
            return Err(RoutingError::invalid_parameter(
                "max_vehicles must be at least 1",
            ));
        }
        self.time_limit().map(|_| ())
    }

    /// The time limit as a [`Duration`].
    ///
    /// Fails with [`RoutingError::InvalidParameter`] unless `time_limit_secs`
    /// is positive, finite and representable as a `Duration`.
    pub fn time_limit(&self) -> Result<Duration> {
        if !self.time_limit_secs.is_finite() || self.time_limit_secs <= 0.0 {
            return Err(RoutingError::invalid_parameter(format!(
                "time_limit_secs must be a positive number, got {}",
                self.time_limit_secs
            )));
        }
        Duration::try_from_secs_f64(self.time_limit_secs).map_err(|e| {
            RoutingError::invalid_parameter(format!(
                "time_limit_secs {} is out of range: {e}",
                self.time_limit_secs
            ))
        })
    }
}

/// Parameters of the random instance generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    /// Number of customers, depot excluded.
    pub num_customers: usize,
    /// Side length of the square grid.
    pub side: f64,
    /// Smallest customer demand (inclusive).
    pub min_demand: i32,
    /// Largest customer demand (inclusive).
    pub max_demand: i32,
    /// RNG seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            num_customers: 10,
            side: 100.0,
            min_demand: 5,
            max_demand: 20,
            seed: None,
        }
    }
}

impl InstanceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_customers == 0 {
            return Err(RoutingError::invalid_parameter(
                "num_customers must be at least 1",
            ));
        }
        if !self.side.is_finite() || self.side <= 0.0 {
            return Err(RoutingError::invalid_parameter(format!(
                "side must be a positive number, got {}",
                self.side
            )));
        }
        if self.min_demand < 0 || self.min_demand > self.max_demand {
            return Err(RoutingError::invalid_parameter(format!(
                "demand range ({}, {}) must satisfy 0 <= min <= max",
                self.min_demand, self.max_demand
            )));
        }
        Ok(())
    }
}

/// Full configuration: instance plus solver parameters.
///
/// # Examples
///
/// ```
/// use u_cvrp::config::Config;
///
/// let config = Config::from_json_str(r#"{"solver": {"capacity": 80}}"#).unwrap();
/// assert_eq!(config.solver.capacity, 80);
/// assert_eq!(config.solver.max_vehicles, 3);
/// assert_eq!(config.instance.num_customers, 10);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub instance: InstanceConfig,
    pub solver: SolverConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.instance.validate()?;
        self.solver.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.solver.time_limit().expect("valid"),
            Duration::from_secs(15)
        );
    }

    #[test]
    fn test_partial_json() {
        let config =
            Config::from_json_str(r#"{"instance": {"seed": 7, "num_customers": 4}}"#).expect("ok");
        assert_eq!(config.instance.seed, Some(7));
        assert_eq!(config.instance.num_customers, 4);
        assert_eq!(config.instance.side, 100.0);
    }

    #[test]
    fn test_rejects_invalid_solver() {
        for json in [
            r#"{"solver": {"capacity": -1}}"#,
            r#"{"solver": {"max_vehicles": 0}}"#,
            r#"{"solver": {"time_limit_secs": 0.0}}"#,
        ] {
            assert!(matches!(
                Config::from_json_str(json),
                Err(RoutingError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_rejects_time_limit_beyond_duration_range() {
        let solver = SolverConfig {
            time_limit_secs: 1e30,
            ..SolverConfig::default()
        };
        assert!(matches!(
            solver.time_limit(),
            Err(RoutingError::InvalidParameter(_))
        ));
        assert!(matches!(
            Config::from_json_str(r#"{"solver": {"time_limit_secs": 1e30}}"#),
            Err(RoutingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_instance() {
        let mut instance = InstanceConfig {
            num_customers: 0,
            ..InstanceConfig::default()
        };
        assert!(instance.validate().is_err());
        instance.num_customers = 3;
        instance.min_demand = 30;
        assert!(instance.validate().is_err());
        instance.min_demand = 5;
        instance.side = f64::NAN;
        assert!(instance.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Config::from_json_str("{"),
            Err(RoutingError::Config(_))
        ));
    }
}
