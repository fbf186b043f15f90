use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::models::geo::GeoPoint;

/// Turns free text into a point and points back into labels.
///
/// Forward resolution distinguishes "no candidate" (`Ok(None)`) from a
/// transport failure (`Err(Transient)`); reverse resolution never fails,
/// degrading to an unlabeled point.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward(&self, address: &str) -> Result<Option<GeoPoint>, AppError>;
    async fn reverse(&self, lat: f64, lon: f64) -> GeoPoint;
}

/// HTTP client for Geoapify's geocoding API.
pub struct GeoapifyGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeoapifyGeocoder {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    async fn search(&self, path: &str, query: &[(&str, &str)]) -> Result<GeocodeResponse, AppError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| AppError::Transient(format!("geocoder unreachable: {err}")))?
            .error_for_status()
            .map_err(|err| AppError::Transient(format!("geocoder error: {err}")))?;

        response
            .json::<GeocodeResponse>()
            .await
            .map_err(|err| AppError::Transient(format!("geocoder response malformed: {err}")))
    }
}

#[async_trait]
impl Geocoder for GeoapifyGeocoder {
    async fn forward(&self, address: &str) -> Result<Option<GeoPoint>, AppError> {
        let body = self
            .search("/v1/geocode/search", &[("text", address)])
            .await?;

        Ok(body.features.into_iter().next().map(|feature| GeoPoint {
            lat: feature.properties.lat,
            lon: feature.properties.lon,
            label: feature.properties.formatted,
        }))
    }

    async fn reverse(&self, lat: f64, lon: f64) -> GeoPoint {
        let lat_s = lat.to_string();
        let lon_s = lon.to_string();
        let body = self
            .search(
                "/v1/geocode/reverse",
                &[("lat", lat_s.as_str()), ("lon", lon_s.as_str())],
            )
            .await;

        let label = match body {
            Ok(body) => body
                .features
                .into_iter()
                .next()
                .and_then(|feature| feature.properties.label()),
            Err(err) => {
                warn!(error = %err, lat, lon, "reverse geocoding failed, using bare coordinates");
                None
            }
        };

        GeoPoint { lat, lon, label }
    }
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Deserialize)]
struct Properties {
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
    formatted: Option<String>,
    street: Option<String>,
    district: Option<String>,
    city: Option<String>,
}

impl Properties {
    /// Street/district/city granularity when available, otherwise the
    /// service's own formatted string.
    fn label(self) -> Option<String> {
        let parts: Vec<String> = [self.street, self.district, self.city]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            self.formatted
        } else {
            Some(parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Properties;

    #[test]
    fn label_prefers_address_components() {
        let props = Properties {
            lat: 10.77,
            lon: 106.70,
            formatted: Some("formatted fallback".to_string()),
            street: Some("Nguyen Hue".to_string()),
            district: Some("District 1".to_string()),
            city: Some("Ho Chi Minh City".to_string()),
        };
        assert_eq!(
            props.label().as_deref(),
            Some("Nguyen Hue, District 1, Ho Chi Minh City")
        );
    }

    #[test]
    fn label_falls_back_to_formatted() {
        let props = Properties {
            lat: 10.77,
            lon: 106.70,
            formatted: Some("somewhere in Saigon".to_string()),
            street: None,
            district: None,
            city: None,
        };
        assert_eq!(props.label().as_deref(), Some("somewhere in Saigon"));
    }
}
