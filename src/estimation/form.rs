//! Form input - raw text fields as a property form submits them
//!
//! Conversion is forgiving: text that does not parse is treated as absent
//! (or zero for counts) instead of rejecting the whole form, because the
//! estimate is recomputed while the user is still typing.

use serde::{Deserialize, Deserializer, Serialize};

use crate::estimation::types::{ConservationState, PropertyAttributes, PropertyType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RentForm {
    #[serde(rename = "type", deserialize_with = "text_or_number")]
    pub property_type: String,
    #[serde(deserialize_with = "text_or_number")]
    pub neighborhood: String,
    /// Blank means the caller's reference city
    #[serde(deserialize_with = "text_or_number")]
    pub city: String,
    #[serde(deserialize_with = "text_or_number")]
    pub interior_area: String,
    #[serde(deserialize_with = "text_or_number")]
    pub exterior_area: String,
    #[serde(deserialize_with = "text_or_number")]
    pub bedrooms: String,
    #[serde(deserialize_with = "text_or_number")]
    pub suites: String,
    #[serde(deserialize_with = "text_or_number")]
    pub parking_spots: String,
    #[serde(deserialize_with = "text_or_number")]
    pub conservation_state: String,
    pub has_pool: bool,
    pub has_gym: bool,
    #[serde(deserialize_with = "text_or_number")]
    pub year_built: String,
}

impl RentForm {
    /// Turn raw form text into calculation input
    pub fn to_attributes(&self, reference_city: &str) -> PropertyAttributes {
        // Catalogue types get their canonical key; anything else is kept as typed
        let catalogue_type = self.property_type.parse::<PropertyType>().ok();
        let property_type = match catalogue_type {
            Some(t) => t.key().to_string(),
            None => self.property_type.trim().to_string(),
        };
        // Amenity checkboxes are only offered for apartments
        let amenities_apply = catalogue_type == Some(PropertyType::Apartment);

        let city = match self.city.trim() {
            "" => reference_city.to_string(),
            city => city.to_string(),
        };

        PropertyAttributes {
            property_type,
            neighborhood: self.neighborhood.trim().to_string(),
            city,
            interior_area: parse_float(&self.interior_area),
            exterior_area: parse_float(&self.exterior_area).unwrap_or(0.0).max(0.0),
            bedrooms: parse_count(&self.bedrooms),
            suites: parse_count(&self.suites),
            parking_spots: parse_count(&self.parking_spots),
            conservation_state: self.conservation_state.parse::<ConservationState>().ok(),
            has_pool: amenities_apply && self.has_pool,
            has_gym: amenities_apply && self.has_gym,
            year_built: parse_int(&self.year_built).and_then(|y| i32::try_from(y).ok()),
        }
    }
}

/// Accept `"80"`, `80`, `80.5` or `null` for a text field
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Field>::deserialize(deserializer)? {
        Some(Field::Text(s)) => s,
        Some(Field::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Parse the leading decimal number of a text field ("85.5 m2" -> 85.5)
pub fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let mut end = sign_len(bytes);
    let digits_start = end;

    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > end + 1 || end > digits_start {
            end = frac_end;
        }
    }

    text[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse the leading integer of a text field ("3 rooms" -> 3)
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let bytes = text.as_bytes();
    let mut end = sign_len(bytes);

    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }

    text[..end].parse::<i64>().ok()
}

/// Counts default to zero and never go negative
pub fn parse_count(text: &str) -> u32 {
    parse_int(text)
        .map(|n| n.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

fn sign_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    }
}
