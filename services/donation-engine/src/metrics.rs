use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    // Business metrics
    pub static ref DONATIONS_CREATED: IntCounterVec = IntCounterVec::new(
        Opts::new("donations_created_total", "Total donations recorded"),
        &["type"]
    ).expect("metric can be created");

    pub static ref DONATIONS_VERIFIED: IntCounter = IntCounter::new(
        "donations_verified_total",
        "Total in-kind donations verified by an NGO"
    ).expect("metric can be created");

    pub static ref VERIFICATION_REJECTED: IntCounterVec = IntCounterVec::new(
        Opts::new("verification_rejected_total", "Verification attempts rejected"),
        &["reason"]
    ).expect("metric can be created");

    pub static ref RECEIPTS_GENERATED: IntCounter = IntCounter::new(
        "receipts_generated_total",
        "Total PDF receipts rendered"
    ).expect("metric can be created");

    pub static ref SIDE_EFFECT_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "side_effect_failures_total",
            "Receipt pipeline collaborator failures (render, mail, notify)"
        ),
        &["collaborator"]
    ).expect("metric can be created");

    pub static ref DONATION_VALUE: Histogram = Histogram::with_opts(
        HistogramOpts::new("donation_value_distribution", "Distribution of donation values")
            .buckets(vec![100.0, 500.0, 1000.0, 5000.0, 10000.0, 50000.0, 100000.0])
    ).expect("metric can be created");
}

/// Register all metrics with the given registry
pub fn register_metrics(registry: &Registry) -> Result<(), Box<dyn std::error::Error>> {
    registry.register(Box::new(DONATIONS_CREATED.clone()))?;
    registry.register(Box::new(DONATIONS_VERIFIED.clone()))?;
    registry.register(Box::new(VERIFICATION_REJECTED.clone()))?;
    registry.register(Box::new(RECEIPTS_GENERATED.clone()))?;
    registry.register(Box::new(SIDE_EFFECT_FAILURES.clone()))?;
    registry.register(Box::new(DONATION_VALUE.clone()))?;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        let registry = Registry::new();
        let result = register_metrics(&registry);
        assert!(result.is_ok());
    }
}
