use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::algorithms::ranging::TravelTimeMode;
use crate::algorithms::solver::SolverConfig;
use crate::core::{DropPoint, Position, DEFAULT_DROP_DEPTH_M, DEFAULT_TRANSDUCER_DEPTH_M, SPEED_OF_SOUND_WATER};
use crate::processing::parser::StationHemispheres;
use crate::validation::data::InvalidRangePolicy;

/// Plausible sound speed range for sea water (m/s)
const SOUND_SPEED_RANGE_MS: (f64, f64) = (1400.0, 1600.0);

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    #[error("{message}")]
    Io { message: String },
    #[error("{message}")]
    Serialization { message: String },
}

impl ConfigError {
    fn invalid(parameter: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Everything one survey run needs besides the stations themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Sound speed in water (m/s)
    pub sound_speed_ms: f64,
    /// Ship transducer depth, positive down (meters)
    pub transducer_depth_m: f64,
    /// Drop location, also the origin of the local plane
    pub reference_point: Position,
    /// Water depth at the drop site, taken as the anchor depth (meters)
    pub drop_depth_m: f64,
    pub travel_time_mode: TravelTimeMode,
    pub invalid_range_policy: InvalidRangePolicy,
    pub station_hemispheres: StationHemispheres,
    pub solver: SolverConfig,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            sound_speed_ms: SPEED_OF_SOUND_WATER,
            transducer_depth_m: DEFAULT_TRANSDUCER_DEPTH_M,
            reference_point: Position::new(0.0, 0.0),
            drop_depth_m: DEFAULT_DROP_DEPTH_M,
            travel_time_mode: TravelTimeMode::default(),
            invalid_range_policy: InvalidRangePolicy::default(),
            station_hemispheres: StationHemispheres::default(),
            solver: SolverConfig::default(),
        }
    }
}

impl SurveyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sound_speed(mut self, sound_speed_ms: f64) -> Self {
        self.sound_speed_ms = sound_speed_ms;
        self
    }

    pub fn with_transducer_depth(mut self, depth_m: f64) -> Self {
        self.transducer_depth_m = depth_m;
        self
    }

    pub fn with_reference_point(mut self, reference: Position) -> Self {
        self.reference_point = reference;
        self
    }

    /// Set both the reference point and the anchor depth from a drop record
    pub fn with_drop_point(mut self, drop: DropPoint) -> Self {
        self.reference_point = drop.position;
        self.drop_depth_m = drop.depth_m;
        self
    }

    pub fn with_travel_time_mode(mut self, mode: TravelTimeMode) -> Self {
        self.travel_time_mode = mode;
        self
    }

    pub fn with_invalid_range_policy(mut self, policy: InvalidRangePolicy) -> Self {
        self.invalid_range_policy = policy;
        self
    }

    pub fn with_station_hemispheres(mut self, hemispheres: StationHemispheres) -> Self {
        self.station_hemispheres = hemispheres;
        self
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn drop_point(&self) -> DropPoint {
        DropPoint::new(self.reference_point, self.drop_depth_m)
    }

    /// Check every parameter, reporting the first one out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min_speed, max_speed) = SOUND_SPEED_RANGE_MS;
        if !(min_speed..=max_speed).contains(&self.sound_speed_ms) {
            return Err(ConfigError::invalid(
                "sound_speed_ms",
                self.sound_speed_ms,
                "sound speed must be between 1400-1600 m/s for sea water",
            ));
        }
        if !self.transducer_depth_m.is_finite() || self.transducer_depth_m < 0.0 {
            return Err(ConfigError::invalid(
                "transducer_depth_m",
                self.transducer_depth_m,
                "depth must be finite and positive down",
            ));
        }
        if !self.drop_depth_m.is_finite() || self.drop_depth_m < 0.0 {
            return Err(ConfigError::invalid(
                "drop_depth_m",
                self.drop_depth_m,
                "depth must be finite and positive down",
            ));
        }
        if self.reference_point.lat.is_nan() || self.reference_point.lat.abs() >= 90.0 {
            return Err(ConfigError::invalid(
                "reference_point.lat",
                self.reference_point.lat,
                "latitude must lie strictly between the poles",
            ));
        }
        if !(-180.0..=180.0).contains(&self.reference_point.lon) {
            return Err(ConfigError::invalid(
                "reference_point.lon",
                self.reference_point.lon,
                "longitude must be within [-180, 180]",
            ));
        }
        if !self.solver.tolerance_m.is_finite() || self.solver.tolerance_m <= 0.0 {
            return Err(ConfigError::invalid(
                "solver.tolerance_m",
                self.solver.tolerance_m,
                "tolerance must be a positive distance",
            ));
        }
        if self.solver.max_iterations == 0 {
            return Err(ConfigError::invalid("solver.max_iterations", 0, "at least one iteration is required"));
        }
        if let Some(limit) = self.solver.divergence_limit_m {
            if limit.is_nan() || limit <= 0.0 {
                return Err(ConfigError::invalid(
                    "solver.divergence_limit_m",
                    limit,
                    "divergence limit must be a positive distance",
                ));
            }
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: SurveyConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::Io {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }
}
