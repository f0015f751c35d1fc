//! Station validation and error taxonomy

pub mod data;
pub mod error;

pub use data::{InvalidRangePolicy, StationValidation, StationValidator};
pub use error::{RangeError, SurveyError};
