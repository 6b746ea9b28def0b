//! Parameter lookup - linear scan over a small, read-only table

use crate::estimation::error::EstimateError;
use crate::estimation::types::{NeighborhoodParameters, TypeParameters};

/// Find the entry for a (neighborhood, city) pair, ignoring case
pub fn find_neighborhood<'a>(
    table: &'a [NeighborhoodParameters],
    neighborhood: &str,
    city: &str,
) -> Option<&'a NeighborhoodParameters> {
    let neighborhood = neighborhood.to_lowercase();
    let city = city.to_lowercase();

    table
        .iter()
        .find(|p| p.neighborhood.to_lowercase() == neighborhood && p.city.to_lowercase() == city)
}

/// Resolve the type parameters for a property, or say which part is missing
pub fn lookup_type_parameters<'a>(
    table: &'a [NeighborhoodParameters],
    neighborhood: &str,
    city: &str,
    type_key: &str,
) -> Result<&'a TypeParameters, EstimateError> {
    let entry = find_neighborhood(table, neighborhood, city).ok_or_else(|| {
        EstimateError::UnknownNeighborhood {
            neighborhood: neighborhood.to_string(),
            city: city.to_string(),
        }
    })?;

    entry
        .type_parameters(type_key)
        .ok_or_else(|| EstimateError::UnknownPropertyType {
            neighborhood: neighborhood.to_string(),
            property_type: type_key.to_string(),
        })
}
