//! Survey report formatting
//!
//! Human-readable text, JSON and CSV renderings of a [`SurveySolution`].

use serde::Serialize;

use crate::algorithms::angles::dd_to_dms;
use crate::api::survey::SurveySolution;
use crate::core::{DmsAngle, Hemisphere};

/// Named solution, the unit every formatter renders
#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport<'a> {
    pub name: &'a str,
    #[serde(flatten)]
    pub solution: &'a SurveySolution,
}

impl<'a> SurveyReport<'a> {
    pub fn new(name: &'a str, solution: &'a SurveySolution) -> Self {
        Self { name, solution }
    }
}

/// Human-readable text formatter
#[derive(Debug, Clone)]
pub struct TextFormatter {
    /// Include the per-station residual table
    pub include_residuals: bool,
    /// Decimal places for coordinates in decimal degrees
    pub precision: usize,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            include_residuals: false,
            precision: 6,
        }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_residuals(mut self) -> Self {
        self.include_residuals = true;
        self
    }

    pub fn format_text(&self, report: &SurveyReport<'_>) -> String {
        let s = report.solution;
        let q = &s.quality;
        let p = self.precision;
        let mut output = String::new();

        output.push_str(&format!("Survey: {}\n", report.name));
        output.push_str(&format!(
            "  Anchor:    {:.p$}, {:.p$}  ({}, {})\n",
            s.anchor.lat,
            s.anchor.lon,
            format_dms(&dd_to_dms(s.anchor.lat, Hemisphere::N, Hemisphere::S)),
            format_dms(&dd_to_dms(s.anchor.lon, Hemisphere::E, Hemisphere::W)),
        ));
        output.push_str(&format!(
            "  Local:     E {:.2} m, N {:.2} m\n",
            s.anchor_local.east_m, s.anchor_local.north_m
        ));
        output.push_str(&format!("  Drop:      {:.p$}, {:.p$}\n", s.drop.lat, s.drop.lon));
        output.push_str(&format!("  Fallback:  {:.2} m\n", q.fallback_m));
        output.push_str(&format!("  RMS:       {:.6} m\n", q.rms_residual_m));
        output.push_str(&format!(
            "  Geometry:  {:?} (condition {:.2}, {})\n",
            q.geometry,
            q.condition_number,
            q.geometry.description()
        ));
        output.push_str(&format!(
            "  Solver:    {:?} after {} iteration(s), {} station(s)\n",
            s.status, s.iterations, s.stations_used
        ));

        for rejected in &s.rejected {
            output.push_str(&format!("  Dropped:   {}\n", rejected));
        }

        if self.include_residuals {
            output.push_str("  Station  Observed(m)  Modeled(m)  Residual(m)\n");
            for r in &q.residuals {
                output.push_str(&format!(
                    "  {:>7}  {:>11.3}  {:>10.3}  {:>11.3}\n",
                    r.station, r.observed_range_m, r.modeled_range_m, r.residual_m
                ));
            }
        }

        output
    }
}

/// JSON formatter
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, report: &SurveyReport<'_>) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
    }
}

/// CSV formatter, one row per survey
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    pub delimiter: char,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> String {
        [
            "name",
            "anchor_lat",
            "anchor_lon",
            "east_m",
            "north_m",
            "fallback_m",
            "rms_m",
            "iterations",
            "status",
            "stations_used",
            "stations_dropped",
        ]
        .join(&self.delimiter.to_string())
    }

    pub fn format_csv(&self, report: &SurveyReport<'_>) -> String {
        let s = report.solution;
        [
            report.name.to_string(),
            format!("{:.8}", s.anchor.lat),
            format!("{:.8}", s.anchor.lon),
            format!("{:.3}", s.anchor_local.east_m),
            format!("{:.3}", s.anchor_local.north_m),
            format!("{:.3}", s.quality.fallback_m),
            format!("{:.6}", s.quality.rms_residual_m),
            s.iterations.to_string(),
            format!("{:?}", s.status),
            s.stations_used.to_string(),
            s.rejected.len().to_string(),
        ]
        .join(&self.delimiter.to_string())
    }
}

/// `35°57.068'N` style rendering with decimal minutes
pub fn format_dms(angle: &DmsAngle) -> String {
    let mut degrees = angle.degrees;
    // Minutes that round up to 60.000' carry into degrees
    let mut minutes = ((angle.minutes + angle.seconds / 60.0) * 1000.0).round() / 1000.0;
    if minutes >= 60.0 {
        minutes -= 60.0;
        degrees += 1.0;
    }
    let hemisphere = angle.hemisphere.map(|h| h.to_string()).unwrap_or_default();
    format!("{}°{:06.3}'{}", degrees, minutes, hemisphere)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::quality::{GeometryQuality, SolutionQuality, StationResidual};
    use crate::algorithms::solver::SolverStatus;
    use crate::core::{LocalPosition, Position};
    use crate::validation::RangeError;

    fn solution() -> SurveySolution {
        SurveySolution {
            anchor: Position::new(35.951533, -75.130167),
            anchor_local: LocalPosition::new(18.03, 44.48),
            drop: Position::new(35.951133, -75.130367),
            quality: SolutionQuality {
                rms_residual_m: 0.42,
                fallback_m: 48.0,
                condition_number: 1.4,
                geometry: GeometryQuality::Excellent,
                residuals: vec![StationResidual {
                    station: 0,
                    modeled_range_m: 250.1,
                    observed_range_m: 250.0,
                    residual_m: 0.1,
                }],
            },
            iterations: 4,
            status: SolverStatus::Converged,
            stations_used: 5,
            rejected: vec![RangeError::InvalidTravelTime { station: 5, travel_time_s: -1.0 }],
        }
    }

    #[test]
    fn test_text_output() {
        let solution = solution();
        let text = TextFormatter::new().with_residuals().format_text(&SurveyReport::new("drop-1", &solution));
        assert!(text.contains("Survey: drop-1"));
        assert!(text.contains("35.951533, -75.130167"));
        assert!(text.contains("Fallback:  48.00 m"));
        assert!(text.contains("Converged after 4 iteration(s), 5 station(s)"));
        assert!(text.contains("Dropped:   station 5"));
        assert!(text.contains("250.100"));
    }

    #[test]
    fn test_json_output() {
        let solution = solution();
        let json = JsonFormatter::new().format_json(&SurveyReport::new("drop-1", &solution)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "drop-1");
        assert_eq!(value["iterations"], 4);
        assert_eq!(value["status"], "converged");
        assert_eq!(value["quality"]["fallback_m"], 48.0);
        assert_eq!(value["anchor"]["lat"], 35.951533);
    }

    #[test]
    fn test_csv_output() {
        let solution = solution();
        let csv = CsvFormatter::new();
        let header_columns = csv.header().split(',').count();
        let row = csv.format_csv(&SurveyReport::new("drop-1", &solution));
        assert_eq!(row.split(',').count(), header_columns);
        assert!(row.starts_with("drop-1,35.95153300,-75.13016700,18.030,44.480,48.000"));
        assert!(row.ends_with(",4,Converged,5,1"));
    }

    #[test]
    fn test_format_dms() {
        let angle = DmsAngle::from_degrees_minutes(35.0, 57.068, Hemisphere::N);
        assert_eq!(format_dms(&angle), "35°57.068'N");
        let angle = DmsAngle::new(75.0, 7.0, 30.0, Some(Hemisphere::W));
        assert_eq!(format_dms(&angle), "75°07.500'W");
    }

    #[test]
    fn test_format_dms_carries_whole_minute() {
        let angle = dd_to_dms(35.99999999, Hemisphere::N, Hemisphere::S);
        assert_eq!(format_dms(&angle), "36°00.000'N");
        let angle = dd_to_dms(-75.49999999, Hemisphere::E, Hemisphere::W);
        assert_eq!(format_dms(&angle), "75°30.000'W");
        let angle = dd_to_dms(12.99999999, Hemisphere::E, Hemisphere::W);
        assert_eq!(format_dms(&angle), "13°00.000'E");
    }
}
