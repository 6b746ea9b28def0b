//! Estimation failures - all expected, user-facing and non-fatal

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    /// Not yet computable; the form is still being filled in
    #[error("Enter the property type, neighborhood and interior area to see an estimate.")]
    MissingRequiredInput,

    #[error("No rental data for neighborhood '{neighborhood}' in {city}.")]
    UnknownNeighborhood { neighborhood: String, city: String },

    #[error("No rental data for property type '{property_type}' in neighborhood '{neighborhood}'.")]
    UnknownPropertyType {
        neighborhood: String,
        property_type: String,
    },

    /// Inputs so large the estimate is not a finite amount
    #[error("The estimate is out of range. Check the areas entered.")]
    OutOfRange,
}

impl EstimateError {
    /// Stable machine-readable tag
    pub fn code(&self) -> &'static str {
        match self {
            EstimateError::MissingRequiredInput => "incomplete",
            EstimateError::UnknownNeighborhood { .. } => "unknown_neighborhood",
            EstimateError::UnknownPropertyType { .. } => "unknown_property_type",
            EstimateError::OutOfRange => "out_of_range",
        }
    }

    /// True when the parameter table lacks data for the input
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            EstimateError::UnknownNeighborhood { .. } | EstimateError::UnknownPropertyType { .. }
        )
    }
}
