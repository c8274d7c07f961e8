use crate::upstream::{Endpoint, OutcomeKind};
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Prometheus metrics for the summary service. Cheap to clone.
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,
    requests: IntCounter,
    cache_hits: IntCounter,
    cache_misses: IntCounter,
    aborted: IntCounter,
    upstream_outcomes: IntCounterVec,
    duration: Histogram,
}

impl MetricsCollector {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests = IntCounter::with_opts(Opts::new(
            "summary_requests_total",
            "Total number of summary requests",
        ))?;

        let cache_hits = IntCounter::with_opts(Opts::new(
            "summary_cache_hits_total",
            "Summary requests answered from the cache",
        ))?;

        let cache_misses = IntCounter::with_opts(Opts::new(
            "summary_cache_misses_total",
            "Summary requests that triggered an aggregation run",
        ))?;

        let aborted = IntCounter::with_opts(Opts::new(
            "summary_aborted_total",
            "Aggregation runs aborted by a fatal upstream outcome",
        ))?;

        let upstream_outcomes = IntCounterVec::new(
            Opts::new(
                "summary_upstream_outcomes_total",
                "Upstream call outcomes by endpoint",
            ),
            &["endpoint", "outcome"],
        )?;

        let duration = Histogram::with_opts(
            HistogramOpts::new(
                "summary_duration_seconds",
                "Duration of aggregation runs in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(cache_hits.clone()))?;
        registry.register(Box::new(cache_misses.clone()))?;
        registry.register(Box::new(aborted.clone()))?;
        registry.register(Box::new(upstream_outcomes.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests,
            cache_hits,
            cache_misses,
            aborted,
            upstream_outcomes,
            duration,
        })
    }

    pub fn record_request(&self) {
        self.requests.inc();
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.inc();
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.inc();
    }

    pub fn record_abort(&self) {
        self.aborted.inc();
    }

    pub fn record_outcome(&self, endpoint: Endpoint, outcome: OutcomeKind) {
        self.upstream_outcomes
            .with_label_values(&[endpoint.as_str(), outcome.as_str()])
            .inc();
    }

    pub fn observe_duration(&self, seconds: f64) {
        self.duration.observe(seconds);
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.get()
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.get()
    }

    pub fn aborted(&self) -> u64 {
        self.aborted.get()
    }

    pub fn upstream_outcomes(&self, endpoint: Endpoint, outcome: OutcomeKind) -> u64 {
        self.upstream_outcomes
            .with_label_values(&[endpoint.as_str(), outcome.as_str()])
            .get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
