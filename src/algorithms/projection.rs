//! Local tangent plane projection
//!
//! Flat-earth conversion between geodetic coordinates and east/north meters
//! about a reference point, using a spherical Earth of fixed radius. Accuracy
//! degrades with distance from the reference and towards the poles, where
//! `cos(ref_lat)` collapses the east axis. Survey areas span a few
//! kilometers, well inside the useful range.

use crate::core::{LocalPosition, Position, EARTH_RADIUS_M};
use crate::validation::SurveyError;

/// Project `(lat, lon)` to `(east, north)` meters about `(ref_lat, ref_lon)`
pub fn latlon_to_xy(lat: f64, lon: f64, ref_lat: f64, ref_lon: f64) -> (f64, f64) {
    let dlat = (lat - ref_lat).to_radians();
    let dlon = (lon - ref_lon).to_radians();
    let east = EARTH_RADIUS_M * dlon * ref_lat.to_radians().cos();
    let north = EARTH_RADIUS_M * dlat;
    (east, north)
}

/// Inverse of [`latlon_to_xy`]
pub fn xy_to_latlon(east: f64, north: f64, ref_lat: f64, ref_lon: f64) -> (f64, f64) {
    let dlat = north / EARTH_RADIUS_M;
    let dlon = east / (EARTH_RADIUS_M * ref_lat.to_radians().cos());
    (ref_lat + dlat.to_degrees(), ref_lon + dlon.to_degrees())
}

/// Projection bound to one reference point for the duration of a survey run
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    reference: Position,
}

impl LocalProjection {
    /// Create a projection about `reference`.
    ///
    /// Rejects non-finite coordinates, the poles, and longitudes outside
    /// [-180, 180].
    pub fn new(reference: Position) -> Result<Self, SurveyError> {
        if !reference.lat.is_finite() || !reference.lon.is_finite() {
            return Err(SurveyError::InvalidInput {
                reason: format!("reference point ({}, {}) is not finite", reference.lat, reference.lon),
            });
        }
        if reference.lat.abs() >= 90.0 {
            return Err(SurveyError::InvalidInput {
                reason: format!("reference latitude {} has no usable east axis", reference.lat),
            });
        }
        if reference.lon.abs() > 180.0 {
            return Err(SurveyError::InvalidInput {
                reason: format!("reference longitude {} out of range", reference.lon),
            });
        }
        Ok(Self { reference })
    }

    pub fn reference(&self) -> Position {
        self.reference
    }

    pub fn to_local(&self, position: &Position) -> LocalPosition {
        let (east, north) = latlon_to_xy(position.lat, position.lon, self.reference.lat, self.reference.lon);
        LocalPosition::new(east, north)
    }

    pub fn to_geodetic(&self, local: &LocalPosition) -> Position {
        let (lat, lon) = xy_to_latlon(local.east_m, local.north_m, self.reference.lat, self.reference.lon);
        Position::new(lat, lon)
    }

    pub fn to_local_batch(&self, positions: &[Position]) -> Vec<LocalPosition> {
        positions.iter().map(|p| self.to_local(p)).collect()
    }
}
