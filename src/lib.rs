// Library module for testable functions

pub mod api;
pub mod config;
pub mod estimation;
pub mod params;

pub use estimation::{estimate, estimate_as_of, EstimateError, RentRange};
