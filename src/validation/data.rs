use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::algorithms::projection::LocalProjection;
use crate::algorithms::ranging::RangeModel;
use crate::core::{LocalPosition, Position, Station, MIN_STATIONS, RECOMMENDED_STATIONS};
use crate::validation::error::{RangeError, SurveyError};

/// What to do with stations whose travel time cannot yield a horizontal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRangePolicy {
    /// Abort the run, listing every bad station
    #[default]
    Reject,
    /// Solve with the remaining stations and report the dropped ones
    Drop,
}

/// Stations projected and ranged, with the rejected ones set aside
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationValidation {
    /// Input index of each accepted station
    pub indices: Vec<usize>,
    pub positions: Vec<LocalPosition>,
    pub ranges: Vec<f64>,
    pub rejected: Vec<RangeError>,
}

impl StationValidation {
    pub fn accepted_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Apply `policy` to the rejected stations and check there are enough left
    pub fn enforce(self, policy: InvalidRangePolicy) -> Result<Self, SurveyError> {
        if !self.rejected.is_empty() {
            match policy {
                InvalidRangePolicy::Reject => {
                    return Err(SurveyError::InvalidRange { errors: self.rejected });
                }
                InvalidRangePolicy::Drop => {
                    for error in &self.rejected {
                        warn!(station = error.station(), "dropping station: {}", error);
                    }
                }
            }
        }

        let available = self.accepted_count();
        if available < MIN_STATIONS {
            return Err(SurveyError::Underdetermined {
                available,
                required: MIN_STATIONS,
            });
        }
        if available < RECOMMENDED_STATIONS {
            warn!(stations = available, "fit is poorly constrained with fewer than {} stations", RECOMMENDED_STATIONS);
        }
        Ok(self)
    }
}

/// Projects stations onto the local plane and derives their horizontal ranges
pub struct StationValidator {
    projection: LocalProjection,
    range_model: RangeModel,
}

impl StationValidator {
    pub fn new(projection: LocalProjection, range_model: RangeModel) -> Self {
        Self { projection, range_model }
    }

    pub fn projection(&self) -> &LocalProjection {
        &self.projection
    }

    /// Validate every station, collecting per-station failures
    pub fn validate(&self, stations: &[Station]) -> StationValidation {
        let mut validation = StationValidation::default();

        for (index, station) in stations.iter().enumerate() {
            match self.range_model.horizontal_range(index, station.travel_time_s) {
                Ok(range) => {
                    let position = Position::new(station.latitude.to_decimal(), station.longitude.to_decimal());
                    validation.indices.push(index);
                    validation.positions.push(self.projection.to_local(&position));
                    validation.ranges.push(range);
                }
                Err(e) => validation.rejected.push(e),
            }
        }

        debug!(
            accepted = validation.accepted_count(),
            rejected = validation.rejected.len(),
            "validated stations"
        );
        validation
    }
}
