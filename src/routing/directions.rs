use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::geo::polyline;
use crate::models::geo::{GeoPoint, Route};

/// Fetches a driving route between two resolved points. `Ok(None)` means
/// the service found no route; `Err(Transient)` means the call itself
/// failed and may be retried.
#[async_trait]
pub trait Directions: Send + Sync {
    async fn fetch_route(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<Option<Route>, AppError>;
}

/// HTTP client for the Google Directions JSON API.
pub struct GoogleDirections {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleDirections {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl Directions for GoogleDirections {
    async fn fetch_route(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<Option<Route>, AppError> {
        let url = format!("{}/maps/api/directions/json", self.base_url);
        let origin_param = format!("{},{}", origin.lat, origin.lon);
        let destination_param = format!("{},{}", destination.lat, destination.lon);

        let body = self
            .client
            .get(&url)
            .query(&[
                ("origin", origin_param.as_str()),
                ("destination", destination_param.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|err| AppError::Transient(format!("directions service unreachable: {err}")))?
            .error_for_status()
            .map_err(|err| AppError::Transient(format!("directions service error: {err}")))?
            .json::<DirectionsResponse>()
            .await
            .map_err(|err| AppError::Transient(format!("directions response malformed: {err}")))?;

        // First route, first leg; distance/duration strings are already
        // locale-formatted upstream and pass through verbatim.
        let Some(route) = body.routes.into_iter().next() else {
            return Ok(None);
        };
        let Some(leg) = route.legs.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(Route {
            path: polyline::decode(&route.overview_polyline.points),
            distance: leg.distance.text,
            duration: leg.duration.text,
        }))
    }
}

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Deserialize)]
struct ApiRoute {
    #[serde(default)]
    legs: Vec<Leg>,
    overview_polyline: OverviewPolyline,
}

#[derive(Deserialize)]
struct OverviewPolyline {
    #[serde(default)]
    points: String,
}

#[derive(Deserialize)]
struct Leg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Deserialize)]
struct TextValue {
    text: String,
}
