//! Prometheus metrics for the audit chain
//!
//! Every instance owns its registry, so tests can create as many
//! collectors as they need without name collisions.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Registry backing the text exposition
    pub registry: Registry,

    /// Records appended for the current sealing cycle
    pub records_appended_total: IntCounter,

    /// Records scheduled into a future cycle
    pub records_deferred_total: IntCounter,

    /// Blocks sealed and appended to the chain
    pub blocks_sealed_total: IntCounter,

    /// Durable writes that failed after the in-memory append
    pub persist_failures_total: IntCounter,

    /// Records waiting in the pending accumulator
    pub pending_records: IntGauge,

    /// Records waiting across all deferred slots
    pub deferred_records: IntGauge,

    /// Publish cycle seal duration
    pub seal_duration_seconds: Histogram,
}

impl Metrics {
    /// Create a collector with a fresh registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let records_appended_total = register_int_counter_with_registry!(
            Opts::new(
                "ledger_records_appended_total",
                "Records appended for the current sealing cycle"
            ),
            registry
        )?;

        let records_deferred_total = register_int_counter_with_registry!(
            Opts::new(
                "ledger_records_deferred_total",
                "Records scheduled into a future sealing cycle"
            ),
            registry
        )?;

        let blocks_sealed_total = register_int_counter_with_registry!(
            Opts::new("ledger_blocks_sealed_total", "Blocks sealed and appended"),
            registry
        )?;

        let persist_failures_total = register_int_counter_with_registry!(
            Opts::new(
                "ledger_persist_failures_total",
                "Durable block writes that failed"
            ),
            registry
        )?;

        let pending_records = register_int_gauge_with_registry!(
            Opts::new(
                "ledger_pending_records",
                "Records waiting in the pending accumulator"
            ),
            registry
        )?;

        let deferred_records = register_int_gauge_with_registry!(
            Opts::new(
                "ledger_deferred_records",
                "Records waiting across all deferred slots"
            ),
            registry
        )?;

        let seal_duration_seconds = register_histogram_with_registry!(
            HistogramOpts::new(
                "ledger_seal_duration_seconds",
                "Publish cycle seal duration in seconds"
            )
            .buckets(vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0]),
            registry
        )?;

        Ok(Self {
            registry,
            records_appended_total,
            records_deferred_total,
            blocks_sealed_total,
            persist_failures_total,
            pending_records,
            deferred_records,
            seal_duration_seconds,
        })
    }

    /// Export all metrics in Prometheus text format
    pub fn export(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
