use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::processing::parser::ParseError;
use crate::utils::config::ConfigError;

/// Per-station failure to produce a usable horizontal range
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum RangeError {
    #[error("station {station}: slant range {slant_range_m:.3} m is shorter than depth difference {depth_difference_m:.3} m")]
    InsufficientSlantRange {
        station: usize,
        slant_range_m: f64,
        depth_difference_m: f64,
    },
    #[error("station {station}: invalid travel time {travel_time_s} s")]
    InvalidTravelTime { station: usize, travel_time_s: f64 },
}

impl RangeError {
    /// Index of the offending station in the input sequence
    pub fn station(&self) -> usize {
        match self {
            RangeError::InsufficientSlantRange { station, .. } => *station,
            RangeError::InvalidTravelTime { station, .. } => *station,
        }
    }
}

/// Errors that abort a single survey run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurveyError {
    #[error("{} station(s) with invalid range: {}", .errors.len(), summarize(.errors))]
    InvalidRange { errors: Vec<RangeError> },
    #[error("underdetermined system: {available} usable station(s), {required} required")]
    Underdetermined { available: usize, required: usize },
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
    #[error("solver failure: {reason}")]
    SolverFailure { reason: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<RangeError> for SurveyError {
    fn from(error: RangeError) -> Self {
        SurveyError::InvalidRange { errors: vec![error] }
    }
}

fn summarize(errors: &[RangeError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
