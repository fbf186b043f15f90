use serde::{Deserialize, Serialize};

/// A bare path vertex produced by the polyline codec.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// A resolved location. `label` is the human-readable address when the
/// geocoder could produce one; a reverse-geocode fallback leaves it empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub label: Option<String>,
}

/// A resolved driving route. `distance` and `duration` are carried verbatim
/// from the directions service, which already locale-formats them. An empty
/// `path` means there is nothing to draw, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub path: Vec<Coordinate>,
    pub distance: String,
    pub duration: String,
}
