//! Core types and constants for the anchor survey

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
