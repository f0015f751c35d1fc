//! Survey algorithms, leaves first

pub mod angles;
pub mod projection;
pub mod ranging;
pub mod solver;
pub mod quality;

pub use angles::{dd_to_dms, dms_to_dd, dms_to_dd_batch};
pub use projection::{latlon_to_xy, xy_to_latlon, LocalProjection};
pub use ranging::{RangeBatch, RangeModel, TravelTimeMode};
pub use solver::{AnchorEstimate, PositionSolver, SolverConfig, SolverStatus};
pub use quality::{
    assess_geometry, fallback_distance, rms_residual, station_residuals, GeometryQuality, SolutionQuality,
    StationResidual,
};
