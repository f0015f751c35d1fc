//! Station log parsing
//!
//! Station files are whitespace-delimited tables, one ranging measurement per
//! row:
//!
//! ```text
//! lat_deg  lat_min  lon_deg  lon_min  travel_time_s
//! ```
//!
//! Positions are recorded to decimal minutes with the hemisphere implied by
//! the survey area, so the hemispheres come from configuration. Blank lines
//! and `#` comments are skipped.
//!
//! The drop record is entered by hand and may carry seconds and explicit
//! hemisphere codes:
//!
//! ```text
//! lat_deg lat_min [lat_sec] [N|S]  lon_deg lon_min [lon_sec] [E|W]  depth
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::{DmsAngle, DropPoint, Hemisphere, Position, Station};

const STATION_COLUMNS: usize = 5;

/// Errors that can occur while reading station or drop records
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected} columns, found {found}")]
    InvalidFormat { line: usize, expected: usize, found: usize },
    #[error("line {line}: invalid {field} '{value}'")]
    InvalidNumber { line: usize, field: String, value: String },
    #[error("unknown hemisphere code '{value}'")]
    UnknownHemisphere { value: String },
    #[error("hemisphere '{value}' is not valid for {axis}")]
    MisplacedHemisphere { axis: String, value: String },
    #[error("drop record needs 'lat lon depth' with lat/lon as 'deg min [sec] [hemisphere]', found {found} fields")]
    InvalidDropRecord { found: usize },
    #[error("no station records found")]
    NoStations,
    #[error("failed to read '{path}': {message}")]
    Io { path: String, message: String },
}

/// Hemispheres applied to every station row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationHemispheres {
    pub latitude: Hemisphere,
    pub longitude: Hemisphere,
}

impl Default for StationHemispheres {
    fn default() -> Self {
        Self {
            latitude: Hemisphere::N,
            longitude: Hemisphere::W,
        }
    }
}

/// Parse a single hemisphere letter such as `N` or `w`
pub fn parse_hemisphere(value: &str) -> Result<Hemisphere, ParseError> {
    let mut chars = value.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Hemisphere::from_char(c).ok_or_else(|| ParseError::UnknownHemisphere {
            value: value.to_string(),
        }),
        _ => Err(ParseError::UnknownHemisphere {
            value: value.to_string(),
        }),
    }
}

/// Parser for station logs and drop records
#[derive(Debug, Clone, Default)]
pub struct StationParser {
    hemispheres: StationHemispheres,
}

impl StationParser {
    pub fn new(hemispheres: StationHemispheres) -> Self {
        Self { hemispheres }
    }

    /// Parse station rows from text
    pub fn parse_str(&self, text: &str) -> Result<Vec<Station>, ParseError> {
        let mut stations = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if let Some(station) = self.parse_line(i + 1, line)? {
                stations.push(station);
            }
        }
        if stations.is_empty() {
            return Err(ParseError::NoStations);
        }
        Ok(stations)
    }

    /// Read and parse a station file
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Station>, ParseError> {
        let text = read(path.as_ref())?;
        self.parse_str(&text)
    }

    /// Parse one row; `Ok(None)` for blank and comment lines
    pub fn parse_line(&self, line_number: usize, line: &str) -> Result<Option<Station>, ParseError> {
        let Some(fields) = split_fields(line_number, line, Some(STATION_COLUMNS))? else {
            return Ok(None);
        };
        let [lat_deg, lat_min, lon_deg, lon_min, travel_time] =
            parse_numbers(line_number, &fields, ["lat_deg", "lat_min", "lon_deg", "lon_min", "travel_time"])?;

        Ok(Some(Station::new(
            DmsAngle::from_degrees_minutes(lat_deg, lat_min, self.hemispheres.latitude),
            DmsAngle::from_degrees_minutes(lon_deg, lon_min, self.hemispheres.longitude),
            travel_time,
        )))
    }

    /// Parse a drop record such as `35 57.068 75 7.822 36` or
    /// `35 57 4.08 N 75 7 49.32 W 36`.
    ///
    /// Without hemisphere codes the configured station hemispheres apply and
    /// both angles must have the same number of fields.
    pub fn parse_drop_record(&self, text: &str) -> Result<DropPoint, ParseError> {
        let line_number = 1;
        let fields = split_fields(line_number, text, None)?.unwrap_or_default();
        let Some((depth, coordinates)) = fields.split_last() else {
            return Err(ParseError::InvalidDropRecord { found: 0 });
        };
        let [(lat_values, lat_code), (lon_values, lon_code)] = split_coordinates(coordinates)?;

        let lat_hemisphere = match lat_code {
            Some(code) => axis_hemisphere(code, "latitude", [Hemisphere::N, Hemisphere::S])?,
            None => self.hemispheres.latitude,
        };
        let lon_hemisphere = match lon_code {
            Some(code) => axis_hemisphere(code, "longitude", [Hemisphere::E, Hemisphere::W])?,
            None => self.hemispheres.longitude,
        };

        let lat = parse_angle(line_number, lat_values, ["lat_deg", "lat_min", "lat_sec"], lat_hemisphere)?;
        let lon = parse_angle(line_number, lon_values, ["lon_deg", "lon_min", "lon_sec"], lon_hemisphere)?;
        let [depth] = parse_numbers(line_number, &[*depth], ["depth"])?;
        Ok(DropPoint::new(Position::new(lat.to_decimal(), lon.to_decimal()), depth))
    }
}

type AngleFields<'a> = (&'a [&'a str], Option<&'a str>);

fn is_hemisphere_token(field: &str) -> bool {
    !field.is_empty() && field.chars().all(|c| c.is_ascii_alphabetic())
}

/// Split drop record coordinates into latitude and longitude fields, each
/// with its hemisphere code if one was given
fn split_coordinates<'a>(fields: &'a [&'a str]) -> Result<[AngleFields<'a>; 2], ParseError> {
    let invalid = || ParseError::InvalidDropRecord { found: fields.len() + 1 };

    let angles = match fields.iter().position(|f| is_hemisphere_token(f)) {
        Some(i) => {
            let (lat, lon) = fields.split_at(i + 1);
            let (lat_code, lat_values) = lat.split_last().ok_or_else(invalid)?;
            let (lon_code, lon_values) = lon.split_last().ok_or_else(invalid)?;
            if !is_hemisphere_token(lon_code) {
                return Err(invalid());
            }
            [(lat_values, Some(*lat_code)), (lon_values, Some(*lon_code))]
        }
        None if fields.len() == 4 || fields.len() == 6 => {
            let (lat, lon) = fields.split_at(fields.len() / 2);
            [(lat, None), (lon, None)]
        }
        None => return Err(invalid()),
    };

    for (values, _) in &angles {
        if !(2..=3).contains(&values.len()) || values.iter().any(|f| is_hemisphere_token(f)) {
            return Err(invalid());
        }
    }
    Ok(angles)
}

fn axis_hemisphere(code: &str, axis: &str, allowed: [Hemisphere; 2]) -> Result<Hemisphere, ParseError> {
    let hemisphere = parse_hemisphere(code)?;
    if !allowed.contains(&hemisphere) {
        return Err(ParseError::MisplacedHemisphere {
            axis: axis.to_string(),
            value: code.to_string(),
        });
    }
    Ok(hemisphere)
}

/// Degrees, minutes and optional seconds
fn parse_angle(
    line_number: usize,
    values: &[&str],
    names: [&str; 3],
    hemisphere: Hemisphere,
) -> Result<DmsAngle, ParseError> {
    let [degrees, minutes, seconds] = match values.len() {
        2 => {
            let [degrees, minutes] = parse_numbers(line_number, values, [names[0], names[1]])?;
            [degrees, minutes, 0.0]
        }
        _ => parse_numbers(line_number, values, names)?,
    };
    Ok(DmsAngle::new(degrees, minutes, seconds, Some(hemisphere)))
}

fn read(path: &Path) -> Result<String, ParseError> {
    fs::read_to_string(path).map_err(|e| ParseError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn split_fields(line_number: usize, line: &str, expected: Option<usize>) -> Result<Option<Vec<&str>>, ParseError> {
    let content = match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    };
    let fields: Vec<&str> = content.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }
    if let Some(expected) = expected.filter(|&n| n != fields.len()) {
        return Err(ParseError::InvalidFormat {
            line: line_number,
            expected,
            found: fields.len(),
        });
    }
    Ok(Some(fields))
}

fn parse_numbers<const N: usize>(
    line_number: usize,
    fields: &[&str],
    names: [&str; N],
) -> Result<[f64; N], ParseError> {
    let mut values = [0.0; N];
    for (i, name) in names.iter().enumerate() {
        let raw = fields[i];
        values[i] = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::InvalidNumber {
                line: line_number,
                field: name.to_string(),
                value: raw.to_string(),
            })?;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# lat_deg lat_min lon_deg lon_min travel_time
35 57.210 75 7.822 0.3712
35 57.068 75 7.650 0.3398

35 56.930 75 7.822 0.3655   # south leg
";

    #[test]
    fn test_parse_sample() {
        let stations = StationParser::default().parse_str(SAMPLE).unwrap();
        assert_eq!(stations.len(), 3);
        assert_eq!(stations[0].latitude.hemisphere, Some(Hemisphere::N));
        assert_eq!(stations[0].longitude.hemisphere, Some(Hemisphere::W));
        assert_eq!(stations[0].latitude.seconds, 0.0);
        assert!((stations[0].latitude.to_decimal() - 35.9535).abs() < 1e-9);
        assert!(stations[1].longitude.to_decimal() < 0.0);
        assert_eq!(stations[2].travel_time_s, 0.3655);
    }

    #[test]
    fn test_custom_hemispheres() {
        let parser = StationParser::new(StationHemispheres {
            latitude: Hemisphere::S,
            longitude: Hemisphere::E,
        });
        let stations = parser.parse_str("12 30 150 15 0.5").unwrap();
        assert!((stations[0].latitude.to_decimal() + 12.5).abs() < 1e-12);
        assert!((stations[0].longitude.to_decimal() - 150.25).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_column_count() {
        let err = StationParser::default().parse_str("35 57.2 75 7.8 0.3\n35 57.2 75 7.8\n").unwrap_err();
        assert_eq!(err, ParseError::InvalidFormat { line: 2, expected: 5, found: 4 });
    }

    #[test]
    fn test_bad_number() {
        let err = StationParser::default().parse_str("35 57.2 75 7.8 fast").unwrap_err();
        match err {
            ParseError::InvalidNumber { line, field, value } => {
                assert_eq!(line, 1);
                assert_eq!(field, "travel_time");
                assert_eq!(value, "fast");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(StationParser::default().parse_str("35 NaN 75 7.8 0.3").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(StationParser::default().parse_str("# nothing\n\n"), Err(ParseError::NoStations));
    }

    #[test]
    fn test_drop_record() {
        let drop = StationParser::default().parse_drop_record("35 57.068 75 7.822 36").unwrap();
        assert!((drop.position.lat - 35.951133).abs() < 1e-6);
        assert!((drop.position.lon + 75.130367).abs() < 1e-6);
        assert_eq!(drop.depth_m, 36.0);
        assert!(StationParser::default().parse_drop_record("35 57.068 75").is_err());
        assert!(StationParser::default().parse_drop_record("").is_err());
    }

    #[test]
    fn test_drop_record_with_hemispheres_and_seconds() {
        let parser = StationParser::default();
        let drop = parser.parse_drop_record("35 57 4.08 N 75 7 49.32 W 36").unwrap();
        assert!((drop.position.lat - 35.951133).abs() < 1e-6);
        assert!((drop.position.lon + 75.130367).abs() < 1e-6);
        assert_eq!(drop.depth_m, 36.0);

        // Explicit codes override the configured station hemispheres
        let drop = parser.parse_drop_record("12 30 s 150 15 e 1200").unwrap();
        assert!((drop.position.lat + 12.5).abs() < 1e-12);
        assert!((drop.position.lon - 150.25).abs() < 1e-12);

        let drop = parser.parse_drop_record("35 57 4.08 75 7 49.32 36").unwrap();
        assert!((drop.position.lon + 75.130367).abs() < 1e-6);
    }

    #[test]
    fn test_drop_record_unknown_hemisphere() {
        let parser = StationParser::default();
        assert_eq!(
            parser.parse_drop_record("35 57.068 X 75 7.822 W 36"),
            Err(ParseError::UnknownHemisphere { value: "X".to_string() })
        );
        assert_eq!(
            parser.parse_drop_record("35 57.068 E 75 7.822 W 36"),
            Err(ParseError::MisplacedHemisphere {
                axis: "latitude".to_string(),
                value: "E".to_string()
            })
        );
    }

    #[test]
    fn test_drop_record_layouts_rejected() {
        let parser = StationParser::default();
        // Only the latitude carries a code
        assert_eq!(
            parser.parse_drop_record("35 57.068 N 75 7.822 36"),
            Err(ParseError::InvalidDropRecord { found: 6 })
        );
        // Mismatched field counts without codes
        assert_eq!(
            parser.parse_drop_record("35 57 4 75 7.822 36"),
            Err(ParseError::InvalidDropRecord { found: 6 })
        );
        assert!(matches!(
            parser.parse_drop_record("35 57.068 N 75 deep W 36"),
            Err(ParseError::InvalidDropRecord { .. })
        ));
        assert!(matches!(
            parser.parse_drop_record("35 57.o68 N 75 7.822 W 36"),
            Err(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_hemisphere_codes() {
        assert_eq!(parse_hemisphere("n"), Ok(Hemisphere::N));
        assert_eq!(parse_hemisphere(" W "), Ok(Hemisphere::W));
        assert!(parse_hemisphere("X").is_err());
        assert!(parse_hemisphere("NE").is_err());
        assert!(parse_hemisphere("").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = StationParser::default().parse_file("/nonexistent/stations.dat").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
