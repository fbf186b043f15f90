use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub claims_total: IntCounterVec,
    pub completions_total: IntCounterVec,
    pub route_resolutions_total: IntCounterVec,
    pub route_resolution_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let claims_total = IntCounterVec::new(
            Opts::new("claims_total", "Claim attempts by outcome"),
            &["outcome"],
        )
        .expect("valid claims_total metric");

        let completions_total = IntCounterVec::new(
            Opts::new("completions_total", "Delivery completions by outcome"),
            &["outcome"],
        )
        .expect("valid completions_total metric");

        let route_resolutions_total = IntCounterVec::new(
            Opts::new("route_resolutions_total", "Route resolutions by outcome"),
            &["outcome"],
        )
        .expect("valid route_resolutions_total metric");

        let route_resolution_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "route_resolution_seconds",
                "Latency of route resolution in seconds",
            ),
            &["outcome"],
        )
        .expect("valid route_resolution_seconds metric");

        registry
            .register(Box::new(claims_total.clone()))
            .expect("register claims_total");
        registry
            .register(Box::new(completions_total.clone()))
            .expect("register completions_total");
        registry
            .register(Box::new(route_resolutions_total.clone()))
            .expect("register route_resolutions_total");
        registry
            .register(Box::new(route_resolution_seconds.clone()))
            .expect("register route_resolution_seconds");

        Self {
            registry,
            claims_total,
            completions_total,
            route_resolutions_total,
            route_resolution_seconds,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
