use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{ResolvedLocation, ReverseGeocodeResponse};

/// Client for the external reverse-geocoding provider.
///
/// Wraps BigDataCloud's free `reverse-geocode-client` endpoint; any provider
/// serving the same response shape works via `GEOCODER_BASE_URL`.
#[derive(Clone)]
pub struct ReverseGeocoder {
    client: Client,
    base_url: String,
    default_country: String,
}

impl ReverseGeocoder {
    /// Creates a new `ReverseGeocoder` from configuration.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.geocode_timeout_secs))
            .build()
            .map_err(|e| {
                AppError::GeocodingError(format!("Failed to create geocoder client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.geocoder_base_url.trim_end_matches('/').to_string(),
            default_country: config.default_country.clone(),
        })
    }

    /// Calls the provider for a single coordinate pair.
    ///
    /// # Returns
    ///
    /// * `Result<ReverseGeocodeResponse, AppError>` - The raw provider body.
    ///   Transport failures, non-success statuses, and unparsable bodies all
    ///   surface as `GeocodingError`; callers wanting the never-fails contract
    ///   use [`resolve`](Self::resolve) instead.
    pub async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ReverseGeocodeResponse, AppError> {
        // Build URL with proper parameter encoding
        let url = reqwest::Url::parse_with_params(
            &format!("{}/data/reverse-geocode-client", self.base_url),
            &[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("localityLanguage", "en".to_string()),
            ],
        )
        .map_err(|e| AppError::GeocodingError(format!("Failed to build URL: {}", e)))?;

        tracing::debug!("Reverse geocoding ({}, {})", latitude, longitude);

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::GeocodingError(format!("Reverse geocode request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::GeocodingError(format!(
                "Geocoding provider returned {}: {}",
                status, error_text
            )));
        }

        let body = response.json().await.map_err(|e| {
            AppError::GeocodingError(format!("Failed to parse reverse geocode response: {}", e))
        })?;

        Ok(body)
    }

    /// Resolves a coordinate pair to a `ResolvedLocation`. Never fails.
    ///
    /// A usable provider response (one carrying a `locality`) produces the
    /// composed address plus postal code / district / state. Anything else
    /// degrades to the coordinates rendered to 4 decimal places with the
    /// optional fields omitted, so confirmation is never blocked on the
    /// provider.
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> ResolvedLocation {
        match self.reverse_geocode(latitude, longitude).await {
            Ok(body) => {
                if let Some(address) = compose_address(&body, &self.default_country) {
                    tracing::info!("Resolved ({}, {}) to {}", latitude, longitude, address);
                    ResolvedLocation {
                        latitude,
                        longitude,
                        address,
                        postal_code: body.postcode.clone(),
                        district: non_empty(&body.principal_subdivision)
                            .or_else(|| non_empty(&body.city))
                            .map(String::from),
                        state: non_empty(&body.principal_subdivision)
                            .or_else(|| non_empty(&body.state))
                            .map(String::from),
                    }
                } else {
                    tracing::warn!(
                        "Reverse geocode response for ({}, {}) has no locality, using coordinate fallback",
                        latitude,
                        longitude
                    );
                    coordinate_fallback(latitude, longitude)
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Reverse geocoding failed for ({}, {}): {}",
                    latitude,
                    longitude,
                    e
                );
                coordinate_fallback(latitude, longitude)
            }
        }
    }
}

/// The degraded address used when reverse geocoding is unavailable.
pub fn fallback_address(latitude: f64, longitude: f64) -> String {
    format!("{:.4}, {:.4}", latitude, longitude)
}

/// Composes the display address from a provider response.
///
/// Returns `None` when the response carries no usable `locality` (absent or
/// empty), which is the provider's signal that it could not place the
/// coordinates.
pub fn compose_address(body: &ReverseGeocodeResponse, default_country: &str) -> Option<String> {
    non_empty(&body.locality)?;

    let place = non_empty(&body.locality)
        .or_else(|| non_empty(&body.city))
        .unwrap_or("Unknown");
    let region = non_empty(&body.principal_subdivision)
        .or_else(|| non_empty(&body.state))
        .unwrap_or("Unknown");
    let country = non_empty(&body.country_name).unwrap_or(default_country);

    Some(format!("{}, {}, {}", place, region, country))
}

/// Empty provider fields count as absent.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn coordinate_fallback(latitude: f64, longitude: f64) -> ResolvedLocation {
    ResolvedLocation {
        latitude,
        longitude,
        address: fallback_address(latitude, longitude),
        postal_code: None,
        district: None,
        state: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoder_creation() {
        let geocoder = ReverseGeocoder::new(&Config::default());
        assert!(geocoder.is_ok());
    }

    #[test]
    fn compose_requires_locality() {
        let body = ReverseGeocodeResponse {
            city: Some("Mumbai".to_string()),
            state: Some("Maharashtra".to_string()),
            ..Default::default()
        };
        assert_eq!(compose_address(&body, "India"), None);
    }

    #[test]
    fn compose_full_response() {
        let body = ReverseGeocodeResponse {
            locality: Some("Bengaluru".to_string()),
            principal_subdivision: Some("Karnataka".to_string()),
            country_name: Some("India".to_string()),
            ..Default::default()
        };
        assert_eq!(
            compose_address(&body, "India").as_deref(),
            Some("Bengaluru, Karnataka, India")
        );
    }

    #[test]
    fn compose_treats_empty_locality_as_absent() {
        let body = ReverseGeocodeResponse {
            locality: Some(String::new()),
            city: Some("Mumbai".to_string()),
            state: Some("Maharashtra".to_string()),
            ..Default::default()
        };
        assert_eq!(compose_address(&body, "India"), None);
    }

    #[test]
    fn compose_skips_empty_region_fields() {
        let body = ReverseGeocodeResponse {
            locality: Some("Panaji".to_string()),
            principal_subdivision: Some(String::new()),
            state: Some("Goa".to_string()),
            country_name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            compose_address(&body, "India").as_deref(),
            Some("Panaji, Goa, India")
        );
    }

    #[test]
    fn compose_defaults_country() {
        let body = ReverseGeocodeResponse {
            locality: Some("Pune".to_string()),
            state: Some("Maharashtra".to_string()),
            ..Default::default()
        };
        assert_eq!(
            compose_address(&body, "India").as_deref(),
            Some("Pune, Maharashtra, India")
        );
    }

    #[test]
    fn fallback_uses_four_decimals() {
        assert_eq!(fallback_address(12.97168, 77.59462), "12.9717, 77.5946");
        assert_eq!(fallback_address(-3.0, 101.5), "-3.0000, 101.5000");
    }
}
