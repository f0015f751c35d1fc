//! Solution quality metrics

use serde::{Deserialize, Serialize};

use crate::algorithms::solver::design_matrix;
use crate::core::LocalPosition;

/// Assessment of station geometry around the final estimate
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum GeometryQuality {
    Excellent,
    Good,
    Acceptable,
    Poor,
    /// Rank-deficient: stations collinear with the anchor, or fewer than two
    Degenerate,
}

impl GeometryQuality {
    /// Classify by condition number of the linearized system
    pub fn from_condition_number(condition_number: f64) -> Self {
        if !condition_number.is_finite() {
            GeometryQuality::Degenerate
        } else if condition_number <= 2.0 {
            GeometryQuality::Excellent
        } else if condition_number <= 5.0 {
            GeometryQuality::Good
        } else if condition_number <= 20.0 {
            GeometryQuality::Acceptable
        } else if condition_number <= 1e6 {
            GeometryQuality::Poor
        } else {
            GeometryQuality::Degenerate
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GeometryQuality::Excellent => "stations well spread around the anchor",
            GeometryQuality::Good => "adequate station spread",
            GeometryQuality::Acceptable => "marginal station spread",
            GeometryQuality::Poor => "stations nearly collinear with the anchor",
            GeometryQuality::Degenerate => "anchor position not fully constrained",
        }
    }
}

/// Modeled versus observed range at one station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationResidual {
    /// Index of the station in the original input
    pub station: usize,
    pub modeled_range_m: f64,
    pub observed_range_m: f64,
    /// `modeled - observed`
    pub residual_m: f64,
}

/// Quality of a finished survey solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionQuality {
    pub rms_residual_m: f64,
    /// Horizontal distance from drop point to anchor on the local plane
    pub fallback_m: f64,
    pub condition_number: f64,
    pub geometry: GeometryQuality,
    pub residuals: Vec<StationResidual>,
}

/// Root mean square of `‖pᵢ - p̂‖ - dᵢ` over all stations.
///
/// Returns 0 for an empty input.
pub fn rms_residual(stations: &[LocalPosition], ranges: &[f64], estimate: &LocalPosition) -> f64 {
    if stations.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = stations
        .iter()
        .zip(ranges)
        .map(|(station, range)| {
            let r = station.distance_to(estimate) - range;
            r * r
        })
        .sum();
    (sum_sq / stations.len() as f64).sqrt()
}

/// Per-station residuals; `indices` maps back to the caller's station numbering
pub fn station_residuals(
    stations: &[LocalPosition],
    ranges: &[f64],
    indices: &[usize],
    estimate: &LocalPosition,
) -> Vec<StationResidual> {
    stations
        .iter()
        .zip(ranges)
        .zip(indices)
        .map(|((station, &observed), &index)| {
            let modeled = station.distance_to(estimate);
            StationResidual {
                station: index,
                modeled_range_m: modeled,
                observed_range_m: observed,
                residual_m: modeled - observed,
            }
        })
        .collect()
}

/// Horizontal distance between drop point and anchor.
///
/// Both arguments are local-plane positions, so the result is always meters.
pub fn fallback_distance(drop: &LocalPosition, anchor: &LocalPosition) -> f64 {
    drop.distance_to(anchor)
}

/// Condition number of the linearized system at `estimate` and its class
pub fn assess_geometry(stations: &[LocalPosition], estimate: &LocalPosition) -> (f64, GeometryQuality) {
    if stations.len() < 2 {
        return (f64::INFINITY, GeometryQuality::Degenerate);
    }
    let ranges = vec![0.0; stations.len()];
    let (a, _) = design_matrix(stations, &ranges, estimate);
    let svd = a.svd(false, false);
    let sigma_max = svd.singular_values.iter().cloned().fold(0.0, f64::max);
    let sigma_min = svd.singular_values.iter().cloned().fold(f64::INFINITY, f64::min);

    let condition_number = if sigma_min > 1e-10 * sigma_max.max(f64::MIN_POSITIVE) {
        sigma_max / sigma_min
    } else {
        f64::INFINITY
    };
    (condition_number, GeometryQuality::from_condition_number(condition_number))
}
