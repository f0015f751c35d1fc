//! Acoustic range model
//!
//! Converts travel times to horizontal ranges on the anchor's depth plane.
//! A station too close overhead for its slant range to span the vertical
//! offset is reported, never turned into NaN.

use serde::{Deserialize, Serialize};

use crate::validation::RangeError;

/// How the recorded travel times were measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelTimeMode {
    /// Interrogation ping out and reply back; the path is covered twice
    #[default]
    RoundTrip,
    /// Synchronized one-way transmission
    OneWay,
}

impl TravelTimeMode {
    fn path_fraction(self) -> f64 {
        match self {
            TravelTimeMode::RoundTrip => 0.5,
            TravelTimeMode::OneWay => 1.0,
        }
    }
}

/// Horizontal ranges accepted from a batch of travel times
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeBatch {
    /// `(station index, horizontal range in meters)`
    pub accepted: Vec<(usize, f64)>,
    pub rejected: Vec<RangeError>,
}

/// Constant sound speed range model for one survey run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeModel {
    pub sound_speed_ms: f64,
    /// Anchor depth minus transducer depth (meters)
    pub depth_difference_m: f64,
    pub mode: TravelTimeMode,
}

impl RangeModel {
    pub fn new(sound_speed_ms: f64, transducer_depth_m: f64, anchor_depth_m: f64, mode: TravelTimeMode) -> Self {
        Self {
            sound_speed_ms,
            depth_difference_m: anchor_depth_m - transducer_depth_m,
            mode,
        }
    }

    /// Straight-line distance covered by the signal between ship and anchor
    pub fn slant_range(&self, travel_time_s: f64) -> f64 {
        travel_time_s * self.mode.path_fraction() * self.sound_speed_ms
    }

    /// Horizontal range for the station at index `station`
    pub fn horizontal_range(&self, station: usize, travel_time_s: f64) -> Result<f64, RangeError> {
        if !travel_time_s.is_finite() || travel_time_s < 0.0 {
            return Err(RangeError::InvalidTravelTime { station, travel_time_s });
        }
        let slant = self.slant_range(travel_time_s);
        let vertical = self.depth_difference_m.abs();
        if slant < vertical {
            return Err(RangeError::InsufficientSlantRange {
                station,
                slant_range_m: slant,
                depth_difference_m: vertical,
            });
        }
        Ok((slant * slant - vertical * vertical).sqrt())
    }

    /// Evaluate every travel time, collecting failures instead of stopping
    pub fn horizontal_ranges(&self, travel_times_s: &[f64]) -> RangeBatch {
        let mut batch = RangeBatch::default();
        for (station, &time) in travel_times_s.iter().enumerate() {
            match self.horizontal_range(station, time) {
                Ok(range) => batch.accepted.push((station, range)),
                Err(e) => batch.rejected.push(e),
            }
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_halves_path() {
        let model = RangeModel::new(1500.0, 5.0, 36.0, TravelTimeMode::RoundTrip);
        assert_eq!(model.depth_difference_m, 31.0);
        assert!((model.slant_range(0.2) - 150.0).abs() < 1e-9);

        let one_way = RangeModel { mode: TravelTimeMode::OneWay, ..model };
        assert!((one_way.slant_range(0.2) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_pythagorean_horizontal_range() {
        // 3-4-5 triangle: slant 50 m, vertical 30 m
        let model = RangeModel::new(1000.0, 0.0, 30.0, TravelTimeMode::RoundTrip);
        let range = model.horizontal_range(0, 0.1).unwrap();
        assert!((range - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_directly_overhead_is_zero_range() {
        let model = RangeModel::new(1000.0, 0.0, 25.0, TravelTimeMode::OneWay);
        assert_eq!(model.horizontal_range(0, 0.025).unwrap(), 0.0);
    }

    #[test]
    fn test_short_slant_range_is_rejected() {
        let model = RangeModel::new(1500.0, 5.0, 36.0, TravelTimeMode::RoundTrip);
        match model.horizontal_range(2, 0.01) {
            Err(RangeError::InsufficientSlantRange { station, slant_range_m, depth_difference_m }) => {
                assert_eq!(station, 2);
                assert!((slant_range_m - 7.5).abs() < 1e-9);
                assert_eq!(depth_difference_m, 31.0);
            }
            other => panic!("expected insufficient slant range, got {other:?}"),
        }
    }

    #[test]
    fn test_transducer_below_anchor_uses_magnitude() {
        let model = RangeModel::new(1000.0, 30.0, 0.0, TravelTimeMode::RoundTrip);
        assert!((model.horizontal_range(0, 0.1).unwrap() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_travel_times() {
        let model = RangeModel::new(1500.0, 5.0, 36.0, TravelTimeMode::RoundTrip);
        assert!(matches!(model.horizontal_range(0, -0.5), Err(RangeError::InvalidTravelTime { .. })));
        assert!(matches!(model.horizontal_range(0, f64::NAN), Err(RangeError::InvalidTravelTime { .. })));
    }

    #[test]
    fn test_batch_collects_all_failures() {
        let model = RangeModel::new(1500.0, 5.0, 36.0, TravelTimeMode::RoundTrip);
        let batch = model.horizontal_ranges(&[0.5, 0.01, 0.6, -1.0]);
        assert_eq!(batch.accepted.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(batch.rejected.iter().map(RangeError::station).collect::<Vec<_>>(), vec![1, 3]);
        for (_, range) in &batch.accepted {
            assert!(range.is_finite() && *range >= 0.0);
        }
    }
}
