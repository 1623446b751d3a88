use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref EVENTS_RECORDED: IntCounter = IntCounter::new(
        "volunteer_events_recorded_total",
        "Total volunteer participation events recorded"
    ).expect("metric can be created");

    pub static ref VOLUNTEERS_JOINED: IntCounter = IntCounter::new(
        "volunteers_joined_total",
        "Total successful campaign joins"
    ).expect("metric can be created");

    pub static ref BADGES_AWARDED: IntCounterVec = IntCounterVec::new(
        Opts::new("badges_awarded_total", "Badge tiers reached"),
        &["badge"]
    ).expect("metric can be created");
}

/// Register all metrics with the given registry
pub fn register_metrics(registry: &Registry) -> Result<(), Box<dyn std::error::Error>> {
    registry.register(Box::new(EVENTS_RECORDED.clone()))?;
    registry.register(Box::new(VOLUNTEERS_JOINED.clone()))?;
    registry.register(Box::new(BADGES_AWARDED.clone()))?;
    Ok(())
}

/// Generate metrics output in Prometheus text format
pub fn metrics_handler() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
