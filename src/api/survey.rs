//! Survey entry points
//!
//! [`solve_survey`] runs one drop end to end: validate configuration,
//! project and range the stations, trilaterate, and score the result.
//! [`solve_batch`] runs independent drops in parallel; each run owns its
//! working state so nothing is shared between threads.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::algorithms::projection::LocalProjection;
use crate::algorithms::quality::{assess_geometry, fallback_distance, rms_residual, station_residuals, SolutionQuality};
use crate::algorithms::ranging::RangeModel;
use crate::algorithms::solver::{PositionSolver, SolverStatus};
use crate::core::{LocalPosition, Position, Station};
use crate::utils::config::SurveyConfig;
use crate::validation::{RangeError, StationValidator, SurveyError};

/// Result of one survey run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySolution {
    pub anchor: Position,
    pub anchor_local: LocalPosition,
    pub drop: Position,
    pub quality: SolutionQuality,
    /// Number of solver update passes
    pub iterations: usize,
    pub status: SolverStatus,
    pub stations_used: usize,
    /// Stations dropped under [`InvalidRangePolicy::Drop`](crate::validation::InvalidRangePolicy::Drop)
    pub rejected: Vec<RangeError>,
}

impl SurveySolution {
    pub fn converged(&self) -> bool {
        self.status == SolverStatus::Converged
    }
}

/// One independent drop for batch processing
#[derive(Debug, Clone)]
pub struct SurveyRun {
    pub name: String,
    pub stations: Vec<Station>,
    pub config: SurveyConfig,
}

impl SurveyRun {
    pub fn new(name: impl Into<String>, stations: Vec<Station>, config: SurveyConfig) -> Self {
        Self {
            name: name.into(),
            stations,
            config,
        }
    }
}

/// Estimate the anchor position for one drop
pub fn solve_survey(stations: &[Station], config: &SurveyConfig) -> Result<SurveySolution, SurveyError> {
    config.validate()?;

    let projection = LocalProjection::new(config.reference_point)?;
    let range_model = RangeModel::new(
        config.sound_speed_ms,
        config.transducer_depth_m,
        config.drop_depth_m,
        config.travel_time_mode,
    );
    debug!(
        stations = stations.len(),
        sound_speed_ms = config.sound_speed_ms,
        depth_difference_m = range_model.depth_difference_m,
        "solving survey"
    );

    let validator = StationValidator::new(projection, range_model);
    let validated = validator.validate(stations).enforce(config.invalid_range_policy)?;

    let solver = PositionSolver::new(config.solver);
    let estimate = solver.solve(&validated.positions, &validated.ranges)?;
    if estimate.status == SolverStatus::MaxIterations {
        warn!(iterations = estimate.iterations, "returning unconverged anchor estimate");
    }

    let drop_local = projection.to_local(&config.reference_point);
    let (condition_number, geometry) = assess_geometry(&validated.positions, &estimate.position);
    let quality = SolutionQuality {
        rms_residual_m: rms_residual(&validated.positions, &validated.ranges, &estimate.position),
        fallback_m: fallback_distance(&drop_local, &estimate.position),
        condition_number,
        geometry,
        residuals: station_residuals(&validated.positions, &validated.ranges, &validated.indices, &estimate.position),
    };

    let anchor = projection.to_geodetic(&estimate.position);
    info!(
        lat = anchor.lat,
        lon = anchor.lon,
        rms_m = quality.rms_residual_m,
        fallback_m = quality.fallback_m,
        iterations = estimate.iterations,
        "anchor located"
    );

    Ok(SurveySolution {
        anchor,
        anchor_local: estimate.position,
        drop: config.reference_point,
        quality,
        iterations: estimate.iterations,
        status: estimate.status,
        stations_used: validated.accepted_count(),
        rejected: validated.rejected,
    })
}

/// Solve independent drops in parallel, results in input order
pub fn solve_batch(runs: &[SurveyRun]) -> Vec<Result<SurveySolution, SurveyError>> {
    runs.par_iter()
        .map(|run| {
            let result = solve_survey(&run.stations, &run.config);
            if let Err(e) = &result {
                warn!(run = %run.name, "survey failed: {}", e);
            }
            result
        })
        .collect()
}
