//! Iterative least-squares trilateration
//!
//! Gauss-Newton on the range-squared residual. Each pass linearizes
//! `|pᵢ - p̂|² = dᵢ²` about the current estimate and solves the resulting
//! over-determined system for a correction step in the minimum-norm least
//! squares sense, so rank-deficient geometry (two stations, collinear
//! stations) still yields a finite step instead of a failure.

use nalgebra::{DMatrix, DVector, Vector2};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{LocalPosition, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE_M, MIN_STATIONS};
use crate::validation::SurveyError;

/// Solver tuning parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Stop once the correction step is shorter than this (meters)
    pub tolerance_m: f64,
    /// Hard cap on update passes
    pub max_iterations: usize,
    /// Abort with [`SolverStatus::Diverged`] when a step exceeds this length.
    /// `None` lets the solver run to `max_iterations` regardless.
    pub divergence_limit_m: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance_m: DEFAULT_TOLERANCE_M,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            divergence_limit_m: None,
        }
    }
}

/// Why the solver stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    Converged,
    /// Iteration cap reached before the step fell below tolerance
    MaxIterations,
    /// A step exceeded the configured divergence limit
    Diverged,
}

/// Final state of the solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorEstimate {
    pub position: LocalPosition,
    /// Number of update passes performed
    pub iterations: usize,
    pub status: SolverStatus,
    /// Length of the last computed correction step (meters)
    pub last_step_m: f64,
}

impl AnchorEstimate {
    pub fn converged(&self) -> bool {
        self.status == SolverStatus::Converged
    }
}

/// Position solver for one batch of stations
#[derive(Debug, Clone, Default)]
pub struct PositionSolver {
    config: SolverConfig,
}

impl PositionSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Estimate the anchor position from station positions and horizontal ranges
    pub fn solve(&self, stations: &[LocalPosition], ranges: &[f64]) -> Result<AnchorEstimate, SurveyError> {
        self.check_inputs(stations, ranges)?;

        let mut estimate = centroid(stations);
        let mut last_step_m = f64::INFINITY;
        debug!(
            stations = stations.len(),
            east = estimate.east_m,
            north = estimate.north_m,
            "starting trilateration from station centroid"
        );

        for iteration in 1..=self.config.max_iterations {
            let (a, b) = design_matrix(stations, ranges, &estimate);
            let step = least_squares_step(a, &b)?;
            let step_norm = step.norm();

            if !step_norm.is_finite() {
                return Err(SurveyError::SolverFailure {
                    reason: format!("non-finite correction step at iteration {}", iteration),
                });
            }

            if let Some(limit) = self.config.divergence_limit_m {
                if step_norm > limit {
                    warn!(iteration, step_m = step_norm, limit_m = limit, "solver diverging, stopping");
                    return Ok(AnchorEstimate {
                        position: estimate,
                        iterations: iteration,
                        status: SolverStatus::Diverged,
                        last_step_m: step_norm,
                    });
                }
            }

            estimate.east_m += step.x;
            estimate.north_m += step.y;
            last_step_m = step_norm;
            trace!(iteration, east = estimate.east_m, north = estimate.north_m, step_m = step_norm);

            if step_norm < self.config.tolerance_m {
                debug!(iterations = iteration, "trilateration converged");
                return Ok(AnchorEstimate {
                    position: estimate,
                    iterations: iteration,
                    status: SolverStatus::Converged,
                    last_step_m,
                });
            }
        }

        warn!(
            max_iterations = self.config.max_iterations,
            last_step_m, "trilateration did not converge"
        );
        Ok(AnchorEstimate {
            position: estimate,
            iterations: self.config.max_iterations,
            status: SolverStatus::MaxIterations,
            last_step_m,
        })
    }

    fn check_inputs(&self, stations: &[LocalPosition], ranges: &[f64]) -> Result<(), SurveyError> {
        if stations.len() != ranges.len() {
            return Err(SurveyError::InvalidInput {
                reason: format!("{} station positions but {} ranges", stations.len(), ranges.len()),
            });
        }
        if stations.len() < MIN_STATIONS {
            return Err(SurveyError::Underdetermined {
                available: stations.len(),
                required: MIN_STATIONS,
            });
        }
        if let Some(i) = stations.iter().position(|p| !p.east_m.is_finite() || !p.north_m.is_finite()) {
            return Err(SurveyError::InvalidInput {
                reason: format!("station {} has a non-finite position", i),
            });
        }
        if let Some(i) = ranges.iter().position(|d| !d.is_finite() || *d < 0.0) {
            return Err(SurveyError::InvalidInput {
                reason: format!("station {} has invalid range {}", i, ranges[i]),
            });
        }
        if self.config.tolerance_m.is_nan() || self.config.tolerance_m <= 0.0 || self.config.max_iterations == 0 {
            return Err(SurveyError::InvalidInput {
                reason: "solver needs a positive tolerance and at least one iteration".to_string(),
            });
        }
        Ok(())
    }
}

/// Mean of the station positions
pub fn centroid(stations: &[LocalPosition]) -> LocalPosition {
    let n = stations.len().max(1) as f64;
    let (east, north) = stations
        .iter()
        .fold((0.0, 0.0), |(east, north), p| (east + p.east_m, north + p.north_m));
    LocalPosition::new(east / n, north / n)
}

/// Linearized system about `estimate`.
///
/// Row `i` of `A` is `[2(xᵢ - x̂), 2(yᵢ - ŷ)]` and
/// `bᵢ = (xᵢ - x̂)² + (yᵢ - ŷ)² - dᵢ²`.
pub fn design_matrix(
    stations: &[LocalPosition],
    ranges: &[f64],
    estimate: &LocalPosition,
) -> (DMatrix<f64>, DVector<f64>) {
    let n = stations.len();
    let mut a = DMatrix::zeros(n, 2);
    let mut b = DVector::zeros(n);

    for (i, (station, range)) in stations.iter().zip(ranges).enumerate() {
        let dx = station.east_m - estimate.east_m;
        let dy = station.north_m - estimate.north_m;
        a[(i, 0)] = 2.0 * dx;
        a[(i, 1)] = 2.0 * dy;
        b[i] = dx * dx + dy * dy - range * range;
    }

    (a, b)
}

/// Minimum-norm least-squares solution of `A·Δ = b`.
///
/// Singular values below `ε·max(m, n)·σ_max` are treated as zero.
pub fn least_squares_step(a: DMatrix<f64>, b: &DVector<f64>) -> Result<Vector2<f64>, SurveyError> {
    let (rows, cols) = a.shape();
    let svd = a.try_svd(true, true, f64::EPSILON, 0).ok_or_else(|| SurveyError::SolverFailure {
        reason: "singular value decomposition did not converge".to_string(),
    })?;

    let sigma_max = svd.singular_values.iter().cloned().fold(0.0, f64::max);
    let cutoff = f64::EPSILON * rows.max(cols) as f64 * sigma_max;

    let x = svd.solve(b, cutoff).map_err(|e| SurveyError::SolverFailure { reason: e.to_string() })?;
    Ok(Vector2::new(x[0], x[1]))
}
