use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// ============ Picker Models ============

/// A coordinate pair captured from a map click.
///
/// Transient and UI-local: replaced on each subsequent click, discarded when
/// the picker closes or a location is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedLocation {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl SelectedLocation {
    /// Creates a selection, rejecting out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, AppError> {
        if !(-90.0..=90.0).contains(&latitude) || !latitude.is_finite() {
            return Err(AppError::BadRequest(format!(
                "latitude out of range: {}",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) || !longitude.is_finite() {
            return Err(AppError::BadRequest(format!(
                "longitude out of range: {}",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// The finalized location record handed to the host on confirmation.
///
/// Serializes with the field names the hosting issue form expects
/// (`lat`/`lng`/`pincode`). The optional fields are omitted entirely when the
/// address came from the coordinate fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// Human-readable address, or the coordinates to 4 decimal places when
    /// reverse geocoding was unavailable.
    pub address: String,
    #[serde(rename = "pincode", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Controlled map view reported by / pushed to the host's map widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
}

// ============ Provider Wire Model ============

/// Body of a BigDataCloud `reverse-geocode-client` response.
///
/// Every field is optional on the wire; absence of `locality` is what
/// distinguishes an unusable response from a usable one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseGeocodeResponse {
    pub locality: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "principalSubdivision")]
    pub principal_subdivision: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "countryName")]
    pub country_name: Option<String>,
    pub postcode: Option<String>,
}

// ============ Issue Documents ============

/// Shape of the `mlaInfo` / `mpInfo` JSONB documents on the `Issues` table.
///
/// The columns themselves enforce no schema; this is the document the
/// application writes (representative name, party, constituency).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentativeInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constituency: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_rejects_out_of_range() {
        assert!(SelectedLocation::new(91.0, 0.0).is_err());
        assert!(SelectedLocation::new(-91.0, 0.0).is_err());
        assert!(SelectedLocation::new(0.0, 181.0).is_err());
        assert!(SelectedLocation::new(0.0, -181.0).is_err());
        assert!(SelectedLocation::new(f64::NAN, 0.0).is_err());
        assert!(SelectedLocation::new(20.5937, 78.9629).is_ok());
    }

    #[test]
    fn resolved_location_omits_fallback_fields() {
        let resolved = ResolvedLocation {
            latitude: 12.9716,
            longitude: 77.5946,
            address: "12.9716, 77.5946".to_string(),
            postal_code: None,
            district: None,
            state: None,
        };

        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["lat"], 12.9716);
        assert_eq!(json["lng"], 77.5946);
        assert!(json.get("pincode").is_none());
        assert!(json.get("district").is_none());
        assert!(json.get("state").is_none());
    }

    #[test]
    fn provider_response_tolerates_missing_fields() {
        let parsed: ReverseGeocodeResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.locality.is_none());

        let parsed: ReverseGeocodeResponse = serde_json::from_str(
            r#"{"locality": "Bengaluru", "principalSubdivision": "Karnataka", "postcode": "560001", "unknownField": 1}"#,
        )
        .unwrap();
        assert_eq!(parsed.locality.as_deref(), Some("Bengaluru"));
        assert_eq!(parsed.principal_subdivision.as_deref(), Some("Karnataka"));
        assert_eq!(parsed.postcode.as_deref(), Some("560001"));
    }

    #[test]
    fn representative_info_document_shape() {
        let mla = RepresentativeInfo {
            name: "A. Representative".to_string(),
            party: Some("Independent".to_string()),
            constituency: None,
        };

        let json = serde_json::to_value(&mla).unwrap();
        assert_eq!(json["name"], "A. Representative");
        assert_eq!(json["party"], "Independent");
        assert!(json.get("constituency").is_none());
    }
}
