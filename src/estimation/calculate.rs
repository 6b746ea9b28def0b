//! Rent calculation - pure functions, no side effects

use chrono::{Datelike, Local};
use tracing::{debug, warn};

use crate::estimation::error::EstimateError;
use crate::estimation::lookup::lookup_type_parameters;
use crate::estimation::types::{
    EstimationResult, NeighborhoodParameters, PropertyAttributes, PropertyType, RentRange,
    TypeParameters,
};

/// Fixed ±10% band around the estimate
pub const MARGIN: f64 = 0.10;
/// Bonus on the base value for buildings younger than `RECENT_BUILD_MAX_AGE`
pub const RECENT_BUILD_BONUS: f64 = 0.05;
/// Penalty on the base value for buildings older than `OLD_BUILD_MIN_AGE`
pub const OLD_BUILD_PENALTY: f64 = 0.10;
pub const RECENT_BUILD_MAX_AGE: i32 = 5;
pub const OLD_BUILD_MIN_AGE: i32 = 30;
/// Years up to and including this one are ignored
pub const MIN_YEAR_BUILT: i32 = 1900;

/// Estimate the rent range for a property using the current calendar year
pub fn estimate(attrs: &PropertyAttributes, table: &[NeighborhoodParameters]) -> EstimationResult {
    estimate_as_of(attrs, table, Local::now().year())
}

/// Estimate the rent range as of a given year
pub fn estimate_as_of(
    attrs: &PropertyAttributes,
    table: &[NeighborhoodParameters],
    current_year: i32,
) -> EstimationResult {
    let (type_key, interior_area) =
        required_inputs(attrs).ok_or(EstimateError::MissingRequiredInput)?;

    let params = lookup_type_parameters(table, &attrs.neighborhood, &attrs.city, type_key)?;

    let base = base_value(interior_area, params);
    let adjustments = total_adjustments(attrs, type_key, params, base, current_year);

    let total = base + adjustments;
    if !total.is_finite() {
        warn!(
            "Estimate for {} in {} overflowed (area {})",
            type_key, attrs.neighborhood, interior_area
        );
        return Err(EstimateError::OutOfRange);
    }

    // Never negative, even with large negative adjustments
    let estimated = total.max(0.0);

    debug!(
        "Estimated rent for {} in {}: base {:.2}, adjustments {:.2}, total {:.2}",
        type_key, attrs.neighborhood, base, adjustments, estimated
    );

    let range = apply_margin(estimated);
    if !range.max.is_finite() {
        return Err(EstimateError::OutOfRange);
    }

    Ok(range)
}

/// Type key and interior area, if the attributes carry enough to compute
fn required_inputs(attrs: &PropertyAttributes) -> Option<(&str, f64)> {
    let type_key = attrs.property_type.trim();
    if type_key.is_empty() || attrs.neighborhood.trim().is_empty() {
        return None;
    }

    let area = attrs.interior_area.filter(|a| a.is_finite() && *a > 0.0)?;

    Some((type_key, area))
}

/// Interior area × average price per m²
pub fn base_value(interior_area: f64, params: &TypeParameters) -> f64 {
    interior_area * params.avg_price_per_sqm
}

/// Sum of every adjustment that has both an input and a coefficient
pub fn total_adjustments(
    attrs: &PropertyAttributes,
    type_key: &str,
    params: &TypeParameters,
    base: f64,
    current_year: i32,
) -> f64 {
    let adj = &params.adjustments;
    let mut total = 0.0;

    total += per_unit(attrs.bedrooms, adj.bedrooms);
    total += per_unit(attrs.suites, adj.suites);
    total += per_unit(attrs.parking_spots, adj.parking_spots);

    // Gated on type alone, zero exterior area still goes through
    if type_key == PropertyType::HouseResidential.key() {
        if let Some(per_sqm) = adj.exterior_area_per_sqm {
            total += attrs.exterior_area * per_sqm;
        }
    }

    if let Some(fraction) = attrs
        .conservation_state
        .and_then(|state| adj.conservation_fraction(state))
    {
        if fraction != 0.0 {
            total += base * fraction;
        }
    }

    if attrs.has_pool {
        total += adj.pool.unwrap_or(0.0);
    }
    if attrs.has_gym {
        total += adj.gym.unwrap_or(0.0);
    }

    if let Some(year) = attrs.year_built {
        total += age_adjustment(year, base, current_year);
    }

    total
}

fn per_unit(count: u32, coefficient: Option<f64>) -> f64 {
    match coefficient {
        Some(c) if count > 0 => f64::from(count) * c,
        _ => 0.0,
    }
}

/// Age band adjustment; years outside (1900, current_year] are ignored
pub fn age_adjustment(year_built: i32, base: f64, current_year: i32) -> f64 {
    if year_built <= MIN_YEAR_BUILT || year_built > current_year {
        return 0.0;
    }

    let age = current_year - year_built;
    if age < RECENT_BUILD_MAX_AGE {
        RECENT_BUILD_BONUS * base
    } else if age > OLD_BUILD_MIN_AGE {
        -OLD_BUILD_PENALTY * base
    } else {
        0.0
    }
}

/// Spread an estimate into the displayed range
pub fn apply_margin(estimated: f64) -> RentRange {
    RentRange {
        min: estimated * (1.0 - MARGIN),
        max: estimated * (1.0 + MARGIN),
        estimated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::types::{Adjustments, ConservationState};
    use std::collections::BTreeMap;

    const YEAR: i32 = 2024;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn table_with(
        property_type: PropertyType,
        price: f64,
        adjustments: Adjustments,
    ) -> Vec<NeighborhoodParameters> {
        let mut types = BTreeMap::new();
        types.insert(
            property_type.key().to_string(),
            TypeParameters {
                avg_price_per_sqm: price,
                adjustments,
            },
        );
        vec![NeighborhoodParameters {
            neighborhood: "Centro".to_string(),
            city: "Belo Horizonte".to_string(),
            types,
        }]
    }

    fn apartment(area: f64) -> PropertyAttributes {
        PropertyAttributes::new(PropertyType::Apartment, "Centro", area)
    }

    #[test]
    fn test_end_to_end_example() {
        let table = table_with(
            PropertyType::Apartment,
            20.0,
            Adjustments {
                bedrooms: Some(50.0),
                ..Default::default()
            },
        );
        let mut attrs = apartment(80.0);
        attrs.bedrooms = 2;

        let range = estimate_as_of(&attrs, &table, YEAR).unwrap();

        assert_close(range.estimated, 1700.0);
        let rounded = range.rounded();
        assert_eq!(rounded.min, 1530.0);
        assert_eq!(rounded.max, 1870.0);
    }

    #[test]
    fn test_missing_area() {
        let table = table_with(PropertyType::Apartment, 20.0, Adjustments::default());
        let mut attrs = apartment(80.0);
        attrs.bedrooms = 3;

        for area in [None, Some(0.0), Some(-10.0), Some(f64::NAN), Some(f64::INFINITY)] {
            attrs.interior_area = area;
            assert_eq!(
                estimate_as_of(&attrs, &table, YEAR),
                Err(EstimateError::MissingRequiredInput)
            );
        }
    }

    #[test]
    fn test_missing_type_or_neighborhood() {
        let table = table_with(PropertyType::Apartment, 20.0, Adjustments::default());

        for blank in ["", "   "] {
            let mut attrs = apartment(80.0);
            attrs.property_type = blank.to_string();
            assert_eq!(
                estimate_as_of(&attrs, &table, YEAR),
                Err(EstimateError::MissingRequiredInput)
            );
        }

        let mut attrs = apartment(80.0);
        attrs.neighborhood = "  ".to_string();
        assert_eq!(
            estimate_as_of(&attrs, &table, YEAR),
            Err(EstimateError::MissingRequiredInput)
        );
    }

    #[test]
    fn test_missing_input_checked_before_lookup() {
        let attrs = PropertyAttributes {
            property_type: "apartment".to_string(),
            neighborhood: "Nowhere".to_string(),
            ..Default::default()
        };
        assert_eq!(
            estimate_as_of(&attrs, &[], YEAR),
            Err(EstimateError::MissingRequiredInput)
        );
    }

    #[test]
    fn test_unknown_neighborhood_even_if_type_known() {
        let table = table_with(PropertyType::Apartment, 20.0, Adjustments::default());
        let attrs = PropertyAttributes::new(PropertyType::Apartment, "Savassi", 80.0);

        let err = estimate_as_of(&attrs, &table, YEAR).unwrap_err();
        assert!(matches!(err, EstimateError::UnknownNeighborhood { .. }));
        assert!(err.to_string().contains("Savassi"));
    }

    #[test]
    fn test_unknown_type() {
        let table = table_with(PropertyType::Apartment, 20.0, Adjustments::default());
        let attrs = PropertyAttributes::new(PropertyType::FlatHotel, "centro", 40.0);

        let err = estimate_as_of(&attrs, &table, YEAR).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("centro"));
        assert!(message.contains("flat-hotel"));
    }

    #[test]
    fn test_type_outside_catalogue_reaches_lookup() {
        let table = table_with(PropertyType::Apartment, 20.0, Adjustments::default());
        let mut attrs = apartment(80.0);
        attrs.property_type = "castle".to_string();

        let err = estimate_as_of(&attrs, &table, YEAR).unwrap_err();
        assert_eq!(
            err,
            EstimateError::UnknownPropertyType {
                neighborhood: "Centro".to_string(),
                property_type: "castle".to_string(),
            }
        );

        attrs.neighborhood = "Nowhere".to_string();
        let err = estimate_as_of(&attrs, &table, YEAR).unwrap_err();
        assert!(matches!(err, EstimateError::UnknownNeighborhood { .. }));
    }

    #[test]
    fn test_type_outside_catalogue_with_table_entry() {
        let mut table = table_with(PropertyType::Apartment, 20.0, Adjustments::default());
        table[0].types.insert(
            "studio".to_string(),
            TypeParameters {
                avg_price_per_sqm: 30.0,
                adjustments: Adjustments::default(),
            },
        );
        let mut attrs = apartment(40.0);
        attrs.property_type = "studio".to_string();

        let range = estimate_as_of(&attrs, &table, YEAR).unwrap();
        assert_close(range.estimated, 1200.0);
    }

    #[test]
    fn test_overflowing_area_is_out_of_range() {
        let table = table_with(PropertyType::Apartment, 20.0, Adjustments::default());
        let attrs = apartment(f64::MAX);

        assert_eq!(
            estimate_as_of(&attrs, &table, YEAR),
            Err(EstimateError::OutOfRange)
        );
    }

    #[test]
    fn test_margin_overflow_is_out_of_range() {
        let table = table_with(PropertyType::Apartment, 1.0, Adjustments::default());
        let attrs = apartment(f64::MAX / 1.05);

        assert_eq!(
            estimate_as_of(&attrs, &table, YEAR),
            Err(EstimateError::OutOfRange)
        );
    }

    #[test]
    fn test_case_insensitive_neighborhood() {
        let table = table_with(PropertyType::Apartment, 20.0, Adjustments::default());
        let upper = estimate_as_of(&apartment(50.0), &table, YEAR).unwrap();
        let lower = estimate_as_of(
            &PropertyAttributes::new(PropertyType::Apartment, "centro", 50.0),
            &table,
            YEAR,
        )
        .unwrap();

        assert_eq!(upper, lower);
    }

    #[test]
    fn test_per_unit_adjustments() {
        let table = table_with(
            PropertyType::Apartment,
            10.0,
            Adjustments {
                bedrooms: Some(100.0),
                suites: Some(150.0),
                parking_spots: Some(80.0),
                ..Default::default()
            },
        );
        let mut attrs = apartment(100.0);
        attrs.bedrooms = 3;
        attrs.suites = 1;
        attrs.parking_spots = 2;

        let range = estimate_as_of(&attrs, &table, YEAR).unwrap();
        assert_close(range.estimated, 1000.0 + 300.0 + 150.0 + 160.0);
    }

    #[test]
    fn test_counts_without_coefficient_are_ignored() {
        let table = table_with(PropertyType::Apartment, 10.0, Adjustments::default());
        let mut attrs = apartment(100.0);
        attrs.bedrooms = 4;
        attrs.suites = 2;
        attrs.parking_spots = 3;

        let range = estimate_as_of(&attrs, &table, YEAR).unwrap();
        assert_close(range.estimated, 1000.0);
    }

    #[test]
    fn test_exterior_area_only_for_residential_house() {
        let adjustments = Adjustments {
            exterior_area_per_sqm: Some(5.0),
            ..Default::default()
        };

        let table = table_with(PropertyType::Apartment, 10.0, adjustments.clone());
        let mut attrs = apartment(100.0);
        attrs.exterior_area = 50.0;
        let range = estimate_as_of(&attrs, &table, YEAR).unwrap();
        assert_close(range.estimated, 1000.0);

        let table = table_with(PropertyType::HouseResidential, 10.0, adjustments);
        let mut attrs = PropertyAttributes::new(PropertyType::HouseResidential, "Centro", 100.0);
        attrs.exterior_area = 50.0;
        let range = estimate_as_of(&attrs, &table, YEAR).unwrap();
        assert_close(range.estimated, 1250.0);

        attrs.exterior_area = 0.0;
        let range = estimate_as_of(&attrs, &table, YEAR).unwrap();
        assert_close(range.estimated, 1000.0);
    }

    #[test]
    fn test_conservation_fraction() {
        let mut fractions = BTreeMap::new();
        fractions.insert("excellent".to_string(), 0.1);
        fractions.insert("needs-renovation".to_string(), -0.2);
        fractions.insert("regular".to_string(), 0.0);
        let table = table_with(
            PropertyType::Apartment,
            10.0,
            Adjustments {
                conservation_state: Some(fractions),
                ..Default::default()
            },
        );
        let mut attrs = apartment(100.0);

        attrs.conservation_state = Some(ConservationState::Excellent);
        assert_close(estimate_as_of(&attrs, &table, YEAR).unwrap().estimated, 1100.0);

        attrs.conservation_state = Some(ConservationState::NeedsRenovation);
        assert_close(estimate_as_of(&attrs, &table, YEAR).unwrap().estimated, 800.0);

        attrs.conservation_state = Some(ConservationState::Regular);
        assert_close(estimate_as_of(&attrs, &table, YEAR).unwrap().estimated, 1000.0);

        // No fraction defined for this state
        attrs.conservation_state = Some(ConservationState::Good);
        assert_close(estimate_as_of(&attrs, &table, YEAR).unwrap().estimated, 1000.0);
    }

    #[test]
    fn test_pool_and_gym_bonuses() {
        let table = table_with(
            PropertyType::Apartment,
            10.0,
            Adjustments {
                pool: Some(120.0),
                gym: Some(60.0),
                ..Default::default()
            },
        );
        let mut attrs = apartment(100.0);
        assert_close(estimate_as_of(&attrs, &table, YEAR).unwrap().estimated, 1000.0);

        attrs.has_pool = true;
        assert_close(estimate_as_of(&attrs, &table, YEAR).unwrap().estimated, 1120.0);

        attrs.has_gym = true;
        assert_close(estimate_as_of(&attrs, &table, YEAR).unwrap().estimated, 1180.0);
    }

    #[test]
    fn test_amenities_without_coefficient() {
        let table = table_with(PropertyType::Apartment, 10.0, Adjustments::default());
        let mut attrs = apartment(100.0);
        attrs.has_pool = true;
        attrs.has_gym = true;

        assert_close(estimate_as_of(&attrs, &table, YEAR).unwrap().estimated, 1000.0);
    }

    #[test]
    fn test_age_bands() {
        let base = 1000.0;
        assert_close(age_adjustment(YEAR - 3, base, YEAR), 50.0);
        assert_close(age_adjustment(YEAR, base, YEAR), 50.0);
        assert_close(age_adjustment(YEAR - 5, base, YEAR), 0.0);
        assert_close(age_adjustment(YEAR - 10, base, YEAR), 0.0);
        assert_close(age_adjustment(YEAR - 30, base, YEAR), 0.0);
        assert_close(age_adjustment(YEAR - 31, base, YEAR), -100.0);
    }

    #[test]
    fn test_age_out_of_range_ignored() {
        let base = 1000.0;
        assert_close(age_adjustment(1900, base, YEAR), 0.0);
        assert_close(age_adjustment(1850, base, YEAR), 0.0);
        assert_close(age_adjustment(YEAR + 1, base, YEAR), 0.0);
        assert_close(age_adjustment(1901, base, YEAR), -100.0);
    }

    #[test]
    fn test_age_stacks_with_conservation() {
        let mut fractions = BTreeMap::new();
        fractions.insert("good".to_string(), 0.05);
        let table = table_with(
            PropertyType::Apartment,
            10.0,
            Adjustments {
                conservation_state: Some(fractions),
                ..Default::default()
            },
        );
        let mut attrs = apartment(100.0);
        attrs.conservation_state = Some(ConservationState::Good);
        attrs.year_built = Some(YEAR - 2);

        assert_close(estimate_as_of(&attrs, &table, YEAR).unwrap().estimated, 1100.0);
    }

    #[test]
    fn test_negative_total_floors_to_zero() {
        let mut fractions = BTreeMap::new();
        fractions.insert("needs-renovation".to_string(), -1.5);
        let table = table_with(
            PropertyType::Apartment,
            10.0,
            Adjustments {
                conservation_state: Some(fractions),
                ..Default::default()
            },
        );
        let mut attrs = apartment(100.0);
        attrs.conservation_state = Some(ConservationState::NeedsRenovation);

        let range = estimate_as_of(&attrs, &table, YEAR).unwrap();
        assert_eq!(range.estimated, 0.0);
        assert_eq!(range.min, 0.0);
        assert_eq!(range.max, 0.0);
    }

    #[test]
    fn test_range_bounds_and_determinism() {
        let table = table_with(
            PropertyType::Apartment,
            23.7,
            Adjustments {
                bedrooms: Some(41.3),
                pool: Some(-900.0),
                ..Default::default()
            },
        );

        for area in [1.0, 12.5, 80.0, 333.3] {
            for bedrooms in 0..4 {
                let mut attrs = apartment(area);
                attrs.bedrooms = bedrooms;
                attrs.has_pool = true;

                let first = estimate_as_of(&attrs, &table, YEAR).unwrap();
                let second = estimate_as_of(&attrs, &table, YEAR).unwrap();

                assert!(first.min >= 0.0);
                assert!(first.min <= first.max);
                assert_eq!(first.min.to_bits(), second.min.to_bits());
                assert_eq!(first.max.to_bits(), second.max.to_bits());
            }
        }
    }

    #[test]
    fn test_table_is_not_mutated() {
        let table = table_with(
            PropertyType::Apartment,
            20.0,
            Adjustments {
                bedrooms: Some(50.0),
                ..Default::default()
            },
        );
        let snapshot = table.clone();
        let mut attrs = apartment(80.0);
        attrs.bedrooms = 2;

        let _ = estimate_as_of(&attrs, &table, YEAR);
        assert_eq!(table, snapshot);
    }

    #[test]
    fn test_estimate_uses_current_year() {
        let table = table_with(PropertyType::Apartment, 10.0, Adjustments::default());
        let mut attrs = apartment(100.0);
        attrs.year_built = Some(Local::now().year());

        let range = estimate(&attrs, &table).unwrap();
        assert_close(range.estimated, 1050.0);
    }
}
