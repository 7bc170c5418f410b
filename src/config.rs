use serde::Deserialize;

/// Default reverse-geocoding provider (BigDataCloud's free client endpoint).
pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://api.bigdatacloud.net";

/// Country name used when the provider response carries none.
pub const DEFAULT_COUNTRY: &str = "India";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub geocoder_base_url: String,
    pub default_country: String,
    pub geocode_timeout_secs: u64,
    /// Initial map view (longitude / latitude / zoom).
    pub initial_longitude: f64,
    pub initial_latitude: f64,
    pub initial_zoom: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            default_country: DEFAULT_COUNTRY.to_string(),
            geocode_timeout_secs: 10,
            // Centered on India, matching the hosting app's default view
            initial_longitude: 78.9629,
            initial_latitude: 20.5937,
            initial_zoom: 6.0,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            geocoder_base_url: std::env::var("GEOCODER_BASE_URL")
                .unwrap_or_else(|_| defaults.geocoder_base_url.clone())
                .trim_end_matches('/')
                .to_string(),
            default_country: std::env::var("DEFAULT_COUNTRY")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| defaults.default_country.clone()),
            geocode_timeout_secs: std::env::var("GEOCODE_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.geocode_timeout_secs.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("GEOCODE_TIMEOUT_SECS must be a valid number"))?,
            initial_longitude: std::env::var("INITIAL_LONGITUDE")
                .unwrap_or_else(|_| defaults.initial_longitude.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("INITIAL_LONGITUDE must be a valid number"))?,
            initial_latitude: std::env::var("INITIAL_LATITUDE")
                .unwrap_or_else(|_| defaults.initial_latitude.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("INITIAL_LATITUDE must be a valid number"))?,
            initial_zoom: std::env::var("INITIAL_ZOOM")
                .unwrap_or_else(|_| defaults.initial_zoom.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("INITIAL_ZOOM must be a valid number"))?,
        };

        let parsed = url::Url::parse(&config.geocoder_base_url)
            .map_err(|e| anyhow::anyhow!("GEOCODER_BASE_URL is not a valid URL: {}", e))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("GEOCODER_BASE_URL must start with http:// or https://");
        }

        if config.geocode_timeout_secs == 0 {
            anyhow::bail!("GEOCODE_TIMEOUT_SECS must be greater than zero");
        }
        if !(-90.0..=90.0).contains(&config.initial_latitude) {
            anyhow::bail!("INITIAL_LATITUDE must be between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&config.initial_longitude) {
            anyhow::bail!("INITIAL_LONGITUDE must be between -180 and 180");
        }

        // Log successful configuration load (without noise in production)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Geocoder base URL: {}", config.geocoder_base_url);
        tracing::debug!("Default country: {}", config.default_country);
        tracing::debug!("Geocode timeout: {}s", config.geocode_timeout_secs);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hosting_app() {
        let config = Config::default();
        assert_eq!(config.geocoder_base_url, "https://api.bigdatacloud.net");
        assert_eq!(config.default_country, "India");
        assert_eq!(config.initial_zoom, 6.0);
    }
}
