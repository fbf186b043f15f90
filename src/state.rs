use std::sync::Arc;

use crate::observability::metrics::Metrics;
use crate::routing::directions::Directions;
use crate::routing::geocoder::Geocoder;
use crate::routing::resolver::RouteResolver;
use crate::store::OrderStore;

pub struct AppState {
    pub orders: OrderStore,
    pub resolver: RouteResolver,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(geocoder: Arc<dyn Geocoder>, directions: Arc<dyn Directions>) -> Self {
        Self {
            orders: OrderStore::new(),
            resolver: RouteResolver::new(geocoder, directions),
            metrics: Metrics::new(),
        }
    }
}
