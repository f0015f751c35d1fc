//! Degrees/minutes/seconds conversion
//!
//! Station logs record positions as degrees and decimal minutes with an
//! implied hemisphere. Everything downstream works in signed decimal degrees.

use crate::core::{DmsAngle, Hemisphere};

/// Convert degrees, minutes and seconds to signed decimal degrees.
///
/// The magnitude is `|degrees| + minutes/60 + seconds/3600`, negated for the
/// southern and western hemispheres. When `hemisphere` is `None` the sign of
/// `degrees` is used instead: a negative value is taken to mean S or W. That
/// fallback only exists for inputs that already carry a sign and is not a
/// general hemisphere inference.
pub fn dms_to_dd(degrees: f64, minutes: f64, seconds: f64, hemisphere: Option<Hemisphere>) -> f64 {
    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    let negative = match hemisphere {
        Some(h) => h.is_negative(),
        None => degrees.is_sign_negative() && degrees != 0.0,
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Elementwise conversion of a batch of angles
pub fn dms_to_dd_batch(angles: &[DmsAngle]) -> Vec<f64> {
    angles.iter().map(DmsAngle::to_decimal).collect()
}

/// Split signed decimal degrees back into degrees, minutes and seconds.
///
/// `positive` and `negative` name the hemispheres for the two signs, e.g.
/// `(N, S)` for latitude.
pub fn dd_to_dms(value: f64, positive: Hemisphere, negative: Hemisphere) -> DmsAngle {
    let hemisphere = if value < 0.0 { negative } else { positive };
    let magnitude = value.abs();
    let degrees = magnitude.trunc();
    let total_minutes = (magnitude - degrees) * 60.0;
    let minutes = total_minutes.trunc();
    let seconds = (total_minutes - minutes) * 60.0;
    DmsAngle::new(degrees, minutes, seconds, Some(hemisphere))
}

impl DmsAngle {
    /// Signed decimal degrees
    pub fn to_decimal(&self) -> f64 {
        dms_to_dd(self.degrees, self.minutes, self.seconds, self.hemisphere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_conversions() {
        let lat = dms_to_dd(35.0, 57.0, 4.0, Some(Hemisphere::N));
        assert!((lat - 35.9511).abs() < 1e-4);

        let lon = dms_to_dd(75.0, 7.0, 49.0, Some(Hemisphere::W));
        assert!((lon + 75.1303).abs() < 1e-4);
    }

    #[test]
    fn test_sign_inferred_from_degrees() {
        assert!(dms_to_dd(-75.0, 7.0, 49.0, None) < 0.0);
        assert!(dms_to_dd(35.0, 57.0, 4.0, None) > 0.0);
        // Explicit hemisphere wins over the sign of degrees
        assert!(dms_to_dd(-35.0, 57.0, 4.0, Some(Hemisphere::N)) > 0.0);
        assert!((dms_to_dd(-35.0, 30.0, 0.0, None) + 35.5).abs() < 1e-12);
    }

    #[test]
    fn test_monotonic_in_each_component() {
        for hemisphere in [Hemisphere::N, Hemisphere::E, Hemisphere::S, Hemisphere::W] {
            let sign = if hemisphere.is_negative() { -1.0 } else { 1.0 };
            let base = dms_to_dd(10.0, 20.0, 30.0, Some(hemisphere));
            let steps = [
                dms_to_dd(11.0, 20.0, 30.0, Some(hemisphere)),
                dms_to_dd(10.0, 21.0, 30.0, Some(hemisphere)),
                dms_to_dd(10.0, 20.0, 31.0, Some(hemisphere)),
            ];
            for stepped in steps {
                assert!(sign * (stepped - base) > 0.0, "{hemisphere} not monotonic");
            }
        }
    }

    #[test]
    fn test_batch_matches_scalar() {
        let angles = [
            DmsAngle::from_degrees_minutes(35.0, 57.068, Hemisphere::N),
            DmsAngle::from_degrees_minutes(75.0, 7.822, Hemisphere::W),
            DmsAngle::new(-12.0, 30.0, 0.0, None),
        ];
        let batch = dms_to_dd_batch(&angles);
        assert_eq!(batch.len(), 3);
        for (angle, value) in angles.iter().zip(&batch) {
            assert_eq!(angle.to_decimal(), *value);
        }
        assert!((batch[0] - 35.951133).abs() < 1e-6);
        assert!((batch[1] + 75.130367).abs() < 1e-6);
    }

    #[test]
    fn test_dd_to_dms_inverts() {
        let value = -75.1303;
        let dms = dd_to_dms(value, Hemisphere::E, Hemisphere::W);
        assert_eq!(dms.hemisphere, Some(Hemisphere::W));
        assert_eq!(dms.degrees, 75.0);
        assert_eq!(dms.minutes, 7.0);
        assert!((dms.to_decimal() - value).abs() < 1e-9);
    }
}
