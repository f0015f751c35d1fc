//! Survey configuration

pub mod config;

pub use config::{ConfigError, SurveyConfig};
