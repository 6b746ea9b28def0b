//! Core data types for rent estimation
//! Pure data structures, plus the small lookups they need

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::estimation::error::EstimateError;

/// City used when the caller does not pick one
pub const DEFAULT_CITY: &str = "Belo Horizonte";

/// Property type catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    Apartment,
    ApartmentPrivateArea,
    HouseCondo,
    HouseResidential,
    Penthouse,
    FlatHotel,
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        PropertyType::Apartment,
        PropertyType::ApartmentPrivateArea,
        PropertyType::HouseCondo,
        PropertyType::HouseResidential,
        PropertyType::Penthouse,
        PropertyType::FlatHotel,
    ];

    /// Key used in the parameter table's type map
    pub fn key(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::ApartmentPrivateArea => "apartment-private-area",
            PropertyType::HouseCondo => "house-condo",
            PropertyType::HouseResidential => "house-residential",
            PropertyType::Penthouse => "penthouse",
            PropertyType::FlatHotel => "flat-hotel",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PropertyType::ALL
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown property type '{}'", wanted))
    }
}

/// Conservation states a property can be declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConservationState {
    Excellent,
    Good,
    Regular,
    NeedsRenovation,
}

impl ConservationState {
    pub const ALL: [ConservationState; 4] = [
        ConservationState::Excellent,
        ConservationState::Good,
        ConservationState::Regular,
        ConservationState::NeedsRenovation,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ConservationState::Excellent => "excellent",
            ConservationState::Good => "good",
            ConservationState::Regular => "regular",
            ConservationState::NeedsRenovation => "needs-renovation",
        }
    }
}

impl std::fmt::Display for ConservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ConservationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ConservationState::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown conservation state '{}'", wanted))
    }
}

/// Property attributes - the input of a single estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAttributes {
    /// Type key as entered; blank means not chosen yet
    #[serde(rename = "type", default)]
    pub property_type: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default = "default_city")]
    pub city: String,

    // Areas in m²
    pub interior_area: Option<f64>,
    #[serde(default)]
    pub exterior_area: f64,

    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub suites: u32,
    #[serde(default)]
    pub parking_spots: u32,

    pub conservation_state: Option<ConservationState>,
    #[serde(default)]
    pub has_pool: bool,
    #[serde(default)]
    pub has_gym: bool,
    pub year_built: Option<i32>,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

impl Default for PropertyAttributes {
    fn default() -> Self {
        PropertyAttributes {
            property_type: String::new(),
            neighborhood: String::new(),
            city: default_city(),
            interior_area: None,
            exterior_area: 0.0,
            bedrooms: 0,
            suites: 0,
            parking_spots: 0,
            conservation_state: None,
            has_pool: false,
            has_gym: false,
            year_built: None,
        }
    }
}

impl PropertyAttributes {
    /// Attributes with only the required fields set, in the default city
    pub fn new(property_type: PropertyType, neighborhood: &str, interior_area: f64) -> Self {
        PropertyAttributes {
            property_type: property_type.key().to_string(),
            neighborhood: neighborhood.to_string(),
            interior_area: Some(interior_area),
            ..Default::default()
        }
    }

    /// Catalogue type, if the entered key is one
    pub fn catalogue_type(&self) -> Option<PropertyType> {
        self.property_type.parse().ok()
    }
}

/// Per-unit adjustment coefficients. Absent means "no adjustment"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustments {
    pub bedrooms: Option<f64>,
    pub suites: Option<f64>,
    pub parking_spots: Option<f64>,
    pub exterior_area_per_sqm: Option<f64>,
    /// Fraction of the base value, keyed by conservation state
    pub conservation_state: Option<BTreeMap<String, f64>>,
    pub pool: Option<f64>,
    pub gym: Option<f64>,
}

impl Adjustments {
    pub fn conservation_fraction(&self, state: ConservationState) -> Option<f64> {
        self.conservation_state
            .as_ref()
            .and_then(|fractions| fractions.get(state.key()))
            .copied()
    }
}

/// Pricing parameters for one property type in one neighborhood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParameters {
    pub avg_price_per_sqm: f64,
    #[serde(default)]
    pub adjustments: Adjustments,
}

/// Market parameters for a (neighborhood, city) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodParameters {
    pub neighborhood: String,
    pub city: String,
    #[serde(default)]
    pub types: BTreeMap<String, TypeParameters>,
}

impl NeighborhoodParameters {
    /// Parameters for a type key; a missing key means "no data", never zero
    pub fn type_parameters(&self, type_key: &str) -> Option<&TypeParameters> {
        self.types.get(type_key)
    }
}

/// Estimated rent range, raw (unformatted) values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentRange {
    pub min: f64,
    pub max: f64,
    /// Midpoint the margin was applied to
    pub estimated: f64,
}

impl RentRange {
    /// Both bounds rounded to two decimals
    pub fn rounded(&self) -> RentRange {
        RentRange {
            min: round_cents(self.min),
            max: round_cents(self.max),
            estimated: round_cents(self.estimated),
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub type EstimationResult = Result<RentRange, EstimateError>;
