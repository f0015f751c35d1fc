//! Survey API and report output
//!
//! `survey` holds the scalar and batch entry points; `formatting` renders
//! their results as text, JSON or CSV.

pub mod survey;
pub mod formatting;

pub use survey::{solve_batch, solve_survey, SurveyRun, SurveySolution};
pub use formatting::{format_dms, CsvFormatter, JsonFormatter, SurveyReport, TextFormatter};
