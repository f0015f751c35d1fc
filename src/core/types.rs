//! Core data types for the anchor survey

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geodetic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Position on the local tangent plane, meters relative to the reference point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPosition {
    pub east_m: f64,
    pub north_m: f64,
}

impl LocalPosition {
    pub fn new(east_m: f64, north_m: f64) -> Self {
        Self { east_m, north_m }
    }

    /// Horizontal distance to another local position
    pub fn distance_to(&self, other: &LocalPosition) -> f64 {
        (self.east_m - other.east_m).hypot(self.north_m - other.north_m)
    }
}

/// Compass hemisphere attached to a latitude or longitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hemisphere {
    N,
    S,
    E,
    W,
}

impl Hemisphere {
    /// Parse a hemisphere letter, case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Hemisphere::N),
            'S' => Some(Hemisphere::S),
            'E' => Some(Hemisphere::E),
            'W' => Some(Hemisphere::W),
            _ => None,
        }
    }

    /// Southern and western hemispheres carry a negative sign
    pub fn is_negative(self) -> bool {
        matches!(self, Hemisphere::S | Hemisphere::W)
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Hemisphere::N => 'N',
            Hemisphere::S => 'S',
            Hemisphere::E => 'E',
            Hemisphere::W => 'W',
        };
        write!(f, "{}", c)
    }
}

/// Angle expressed as degrees, minutes and seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DmsAngle {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
    /// When absent the sign of `degrees` decides the hemisphere
    pub hemisphere: Option<Hemisphere>,
}

impl DmsAngle {
    pub fn new(degrees: f64, minutes: f64, seconds: f64, hemisphere: Option<Hemisphere>) -> Self {
        Self { degrees, minutes, seconds, hemisphere }
    }

    /// Degrees and decimal minutes, the precision used by station logs
    pub fn from_degrees_minutes(degrees: f64, minutes: f64, hemisphere: Hemisphere) -> Self {
        Self::new(degrees, minutes, 0.0, Some(hemisphere))
    }
}

/// One acoustic ranging measurement taken from the ship
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub latitude: DmsAngle,
    pub longitude: DmsAngle,
    /// Travel time in seconds, one-way or round-trip per configuration
    pub travel_time_s: f64,
}

impl Station {
    pub fn new(latitude: DmsAngle, longitude: DmsAngle, travel_time_s: f64) -> Self {
        Self { latitude, longitude, travel_time_s }
    }
}

/// Ship position and water depth when the anchor was released
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropPoint {
    pub position: Position,
    /// Water depth at the drop site, positive down (meters)
    pub depth_m: f64,
}

impl DropPoint {
    pub fn new(position: Position, depth_m: f64) -> Self {
        Self { position, depth_m }
    }
}
