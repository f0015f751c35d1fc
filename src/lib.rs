//! Acoustic Anchor Survey
//!
//! Locates a seafloor acoustic anchor from travel times measured at several
//! ship stations, using iterated least-squares trilateration on a local
//! tangent plane centered on the drop point.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{DmsAngle, DropPoint, Hemisphere, LocalPosition, Position, Station, SPEED_OF_SOUND_WATER};
pub use algorithms::{
    dms_to_dd, dms_to_dd_batch, latlon_to_xy, xy_to_latlon, AnchorEstimate, GeometryQuality, LocalProjection,
    PositionSolver, RangeModel, SolutionQuality, SolverConfig, SolverStatus, TravelTimeMode,
};
pub use processing::{ParseError, StationHemispheres, StationParser};
pub use validation::{InvalidRangePolicy, RangeError, SurveyError};
pub use utils::{ConfigError, SurveyConfig};
pub use api::{
    solve_batch, solve_survey, CsvFormatter, JsonFormatter, SurveyReport, SurveyRun, SurveySolution, TextFormatter,
};
