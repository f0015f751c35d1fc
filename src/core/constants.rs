//! Physical constants and survey defaults

/// Speed of sound in water under standard conditions (m/s)
pub const SPEED_OF_SOUND_WATER: f64 = 1500.0;

/// Mean Earth radius for the spherical local-plane approximation (meters)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Default depth of the ship's transducer, positive down (meters)
pub const DEFAULT_TRANSDUCER_DEPTH_M: f64 = 5.0;

/// Default water depth at the drop site, taken as the anchor depth (meters)
pub const DEFAULT_DROP_DEPTH_M: f64 = 36.0;

/// Default solver convergence tolerance on the step norm (meters)
pub const DEFAULT_TOLERANCE_M: f64 = 0.01;

/// Default cap on solver iterations
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Minimum number of stations for the two-unknown system to be solvable
pub const MIN_STATIONS: usize = 2;

/// Station count below which the fit is considered poorly constrained
pub const RECOMMENDED_STATIONS: usize = 3;
