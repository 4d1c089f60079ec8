//! Tunable simulation and prediction parameters.
//!
//! Both configs are Bevy resources with defaults matching the demo
//! scene. Values are validated with [`SimulationConfig::validate`]
//! and [`PredictionConfig::validate`] before a run is trusted.

use bevy::prelude::Resource;

use crate::types::DEFAULT_G;

/// Errors raised by configuration validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("gravitational constant must be positive and finite (got {0})")]
    InvalidGravitationalConstant(f64),

    #[error("{field} must be non-negative and finite (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("prediction needs at least one step")]
    ZeroSteps,

    #[error("prediction time step must be positive and finite (got {0})")]
    InvalidTimeStep(f64),

    #[error("throw-to-velocity scale must be finite (got {0})")]
    InvalidThrowScale(f64),
}

/// Which pairs interact, and in which direction.
///
/// Each variant carries only the switches that apply to it, so a threshold
/// or policy flag can never be set for a mode that ignores it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum InteractionMode {
    /// Full symmetric N-body gravity.
    #[default]
    AllPairs,
    /// Central/non-central topology with per-direction switches.
    CentralMass(CentralPolicy),
    /// Pairs where both masses are below the threshold are skipped.
    FilterByMass { small_mass_threshold: f64 },
}

/// Direction switches for [`InteractionMode::CentralMass`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CentralPolicy {
    /// Centrals pull on non-centrals.
    pub central_exerts_on_others: bool,
    /// Non-centrals pull on centrals.
    pub others_exert_on_central: bool,
    /// Centrals pull on each other.
    pub central_to_central_attract: bool,
    /// Non-centrals pull on each other.
    pub non_central_mutual_attraction: bool,
}

impl Default for CentralPolicy {
    /// Star-dominated system: planets feel the star and nothing else.
    fn default() -> Self {
        Self {
            central_exerts_on_others: true,
            others_exert_on_central: false,
            central_to_central_attract: true,
            non_central_mutual_attraction: false,
        }
    }
}

impl CentralPolicy {
    /// Whether a body classified `receiver_central` feels a body classified
    /// `source_central`.
    pub fn allows(&self, receiver_central: bool, source_central: bool) -> bool {
        match (receiver_central, source_central) {
            (false, true) => self.central_exerts_on_others,
            (true, false) => self.others_exert_on_central,
            (true, true) => self.central_to_central_attract,
            (false, false) => self.non_central_mutual_attraction,
        }
    }
}

/// Process-wide force-law parameters.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Gravitational constant. Default: 100.
    pub g: f64,
    /// Pairs closer than this are skipped entirely. Default: 0.1.
    pub min_distance: f64,
    /// Added in quadrature to the squared distance. Default: 0.05.
    pub softening: f64,
    /// Post-step speed clamp, 0 disables. Default: 0.
    pub max_speed: f64,
    /// Per-pair force magnitude cap, 0 disables. Default: 0.
    pub max_force_per_pair: f64,
    /// Mass at or above which a body counts as central, 0 = tag only.
    pub central_mass_threshold: f64,
    /// Interaction topology. Default: all pairs.
    pub interaction: InteractionMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            min_distance: 0.1,
            softening: 0.05,
            max_speed: 0.0,
            max_force_per_pair: 0.0,
            central_mass_threshold: 0.0,
            interaction: InteractionMode::AllPairs,
        }
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.g.is_finite() && self.g > 0.0) {
            return Err(ConfigError::InvalidGravitationalConstant(self.g));
        }
        non_negative("min_distance", self.min_distance)?;
        non_negative("softening", self.softening)?;
        non_negative("max_speed", self.max_speed)?;
        non_negative("max_force_per_pair", self.max_force_per_pair)?;
        non_negative("central_mass_threshold", self.central_mass_threshold)?;
        if let InteractionMode::FilterByMass { small_mass_threshold } = self.interaction {
            non_negative("small_mass_threshold", small_mass_threshold)?;
        }
        Ok(())
    }
}

/// Parameters of a trajectory preview run.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct PredictionConfig {
    /// Number of integration steps (and output points). Default: 500.
    pub steps: usize,
    /// Integration step in seconds. Default: 0.02.
    pub time_step: f64,
    /// Drag distance to velocity scale. Default: 0.1.
    pub throw_to_velocity_scale: f64,
    /// Launch speed cap, 0 = unlimited. Default: 200.
    pub max_initial_velocity: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            steps: 500,
            time_step: 0.02,
            throw_to_velocity_scale: 0.1,
            max_initial_velocity: 200.0,
        }
    }
}

impl PredictionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.time_step));
        }
        if !self.throw_to_velocity_scale.is_finite() {
            return Err(ConfigError::InvalidThrowScale(self.throw_to_velocity_scale));
        }
        non_negative("max_initial_velocity", self.max_initial_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
        assert_eq!(PredictionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_simulation_values() {
        let config = SimulationConfig {
            g: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidGravitationalConstant(0.0))
        );

        let config = SimulationConfig {
            softening: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { field: "softening", .. })
        ));

        let config = SimulationConfig {
            interaction: InteractionMode::FilterByMass {
                small_mass_threshold: f64::NAN,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_prediction_values() {
        let config = PredictionConfig {
            steps: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroSteps));

        let config = PredictionConfig {
            time_step: -0.1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimeStep(-0.1)));
    }

    #[test]
    fn test_central_policy_directions() {
        let policy = CentralPolicy {
            central_exerts_on_others: true,
            others_exert_on_central: false,
            central_to_central_attract: false,
            non_central_mutual_attraction: true,
        };
        assert!(policy.allows(false, true));
        assert!(!policy.allows(true, false));
        assert!(!policy.allows(true, true));
        assert!(policy.allows(false, false));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::Negative {
            field: "max_speed",
            value: -3.0,
        };
        assert_eq!(
            err.to_string(),
            "max_speed must be non-negative and finite (got -3)"
        );
    }
}
