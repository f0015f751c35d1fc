//! Station log input

pub mod parser;

pub use parser::{parse_hemisphere, ParseError, StationHemispheres, StationParser};
