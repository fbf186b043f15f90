use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::geo::{GeoPoint, Route};
use crate::routing::directions::Directions;
use crate::routing::geocoder::Geocoder;

/// Outcome of the device-location permission request, as reported by the
/// client. `Reuse` asks for the previously acquired fix instead of a fresh
/// acquisition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionFix {
    Granted { lat: f64, lon: f64 },
    Reuse,
    Denied,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Location,
    Address,
    Route,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailReason {
    PermissionDenied,
    NotFound,
    /// Upstream call failed; the caller may retry.
    Transient,
}

/// Terminal result of one resolution attempt. `Superseded` means a newer
/// request for the same shipper replaced this one mid-flight; its result
/// was discarded without touching the published state.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    Ready {
        shipper: GeoPoint,
        delivery: GeoPoint,
        route: Route,
    },
    Failed {
        stage: Stage,
        reason: FailReason,
    },
    Superseded,
}

/// Observable position of a shipper's in-flight resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionState {
    Idle,
    AcquiringLocation,
    ResolvingAddress,
    FetchingRoute,
    Done(Resolution),
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    shipper_point: Option<GeoPoint>,
    state: ResolutionState,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            generation: 0,
            shipper_point: None,
            state: ResolutionState::Idle,
        }
    }
}

/// Sequences device position -> reverse geocode -> address geocode ->
/// route fetch, owning one mutable request slot per shipper.
///
/// Every stage transition is guarded by the slot's generation counter, so
/// a resolution superseded by a newer request (the delivery address
/// changed, the shipper re-opened the map) publishes nothing and reports
/// `Superseded` instead of racing the replacement.
pub struct RouteResolver {
    geocoder: Arc<dyn Geocoder>,
    directions: Arc<dyn Directions>,
    slots: DashMap<Uuid, Slot>,
}

enum Origin {
    Fresh(f64, f64),
    Cached(GeoPoint),
}

impl RouteResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, directions: Arc<dyn Directions>) -> Self {
        Self {
            geocoder,
            directions,
            slots: DashMap::new(),
        }
    }

    pub async fn resolve(
        &self,
        shipper_id: Uuid,
        fix: PositionFix,
        delivery_address: &str,
    ) -> Resolution {
        let generation = self.begin(shipper_id);

        let origin = match fix {
            PositionFix::Denied => {
                warn!(shipper_id = %shipper_id, "location permission denied");
                return self.finish(
                    shipper_id,
                    generation,
                    Resolution::Failed {
                        stage: Stage::Location,
                        reason: FailReason::PermissionDenied,
                    },
                );
            }
            PositionFix::Granted { lat, lon } => Origin::Fresh(lat, lon),
            PositionFix::Reuse => {
                let cached = self
                    .slots
                    .get(&shipper_id)
                    .and_then(|slot| slot.shipper_point.clone());
                match cached {
                    Some(point) => Origin::Cached(point),
                    None => {
                        return self.finish(
                            shipper_id,
                            generation,
                            Resolution::Failed {
                                stage: Stage::Location,
                                reason: FailReason::PermissionDenied,
                            },
                        );
                    }
                }
            }
        };

        if !self.advance(shipper_id, generation, ResolutionState::ResolvingAddress) {
            return Resolution::Superseded;
        }

        // Reverse geocoding the fix never fails the flow; it runs alongside
        // the forward geocode of the delivery address.
        let reverse = async {
            match origin {
                Origin::Fresh(lat, lon) => self.geocoder.reverse(lat, lon).await,
                Origin::Cached(point) => point,
            }
        };
        let (shipper_point, delivery_result) =
            futures::join!(reverse, self.geocoder.forward(delivery_address));

        // The fix stays reusable even if this request ends up superseded;
        // only the resolution outcome is generation-guarded.
        if let Some(mut slot) = self.slots.get_mut(&shipper_id) {
            slot.shipper_point = Some(shipper_point.clone());
        }

        let delivery = match delivery_result {
            Ok(Some(point)) => point,
            Ok(None) => {
                return self.finish(
                    shipper_id,
                    generation,
                    Resolution::Failed {
                        stage: Stage::Address,
                        reason: FailReason::NotFound,
                    },
                );
            }
            Err(err) => {
                warn!(error = %err, "delivery address geocoding failed");
                return self.finish(
                    shipper_id,
                    generation,
                    Resolution::Failed {
                        stage: Stage::Address,
                        reason: FailReason::Transient,
                    },
                );
            }
        };

        if !self.advance(shipper_id, generation, ResolutionState::FetchingRoute) {
            return Resolution::Superseded;
        }

        let route = match self.directions.fetch_route(&shipper_point, &delivery).await {
            Ok(Some(route)) => route,
            Ok(None) => {
                return self.finish(
                    shipper_id,
                    generation,
                    Resolution::Failed {
                        stage: Stage::Route,
                        reason: FailReason::NotFound,
                    },
                );
            }
            Err(err) => {
                warn!(error = %err, "route fetch failed");
                return self.finish(
                    shipper_id,
                    generation,
                    Resolution::Failed {
                        stage: Stage::Route,
                        reason: FailReason::Transient,
                    },
                );
            }
        };

        info!(
            shipper_id = %shipper_id,
            distance = %route.distance,
            duration = %route.duration,
            "route resolved"
        );

        self.finish(
            shipper_id,
            generation,
            Resolution::Ready {
                shipper: shipper_point,
                delivery,
                route,
            },
        )
    }

    /// Current state of the shipper's slot; `Idle` if none exists.
    pub fn state(&self, shipper_id: Uuid) -> ResolutionState {
        self.slots
            .get(&shipper_id)
            .map(|slot| slot.state.clone())
            .unwrap_or(ResolutionState::Idle)
    }

    /// Claims the slot for a new attempt, invalidating any in-flight one.
    fn begin(&self, shipper_id: Uuid) -> u64 {
        let mut slot = self.slots.entry(shipper_id).or_default();
        slot.generation += 1;
        slot.state = ResolutionState::AcquiringLocation;
        slot.generation
    }

    /// Publishes an intermediate state; returns false when superseded.
    fn advance(&self, shipper_id: Uuid, generation: u64, state: ResolutionState) -> bool {
        match self.slots.get_mut(&shipper_id) {
            Some(mut slot) if slot.generation == generation => {
                slot.state = state;
                true
            }
            _ => false,
        }
    }

    /// Publishes a terminal outcome, or discards it when superseded.
    fn finish(&self, shipper_id: Uuid, generation: u64, resolution: Resolution) -> Resolution {
        match self.slots.get_mut(&shipper_id) {
            Some(mut slot) if slot.generation == generation => {
                slot.state = ResolutionState::Done(resolution.clone());
                resolution
            }
            _ => Resolution::Superseded,
        }
    }
}
