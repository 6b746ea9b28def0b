//! Rent estimation - a pure calculation core
//!
//! Property attributes plus a read-only parameter table in, a rent range or a
//! descriptive failure out. No I/O happens here.

pub mod calculate;
pub mod error;
pub mod form;
pub mod format;
pub mod lookup;
pub mod types;

pub use calculate::{estimate, estimate_as_of};
pub use error::EstimateError;
pub use form::RentForm;
pub use format::{format_brl, format_range};
pub use types::*;
