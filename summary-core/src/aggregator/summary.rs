use super::orders::OrderAggregator;
use super::settle;
use crate::composer::{CustomerSummary, OrderBatch, SummaryBuilder};
use crate::config::Config;
use crate::error::Result;
use crate::observability::MetricsCollector;
use crate::security::validate_identifier;
use crate::storage::{Clock, SummaryCache};
use crate::upstream::{
    BillingProvider, Endpoint, FinanceroClient, HttpUpstream, OderinoClient, OrderProvider,
    Partial,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Builds customer summaries from both providers and serves them through
/// the cache while fresh.
pub struct SummaryAggregator {
    billing: Arc<dyn BillingProvider>,
    order_provider: Arc<dyn OrderProvider>,
    orders: OrderAggregator,
    cache: Arc<SummaryCache>,
    metrics: Option<MetricsCollector>,
}

impl SummaryAggregator {
    pub fn new(
        billing: Arc<dyn BillingProvider>,
        order_provider: Arc<dyn OrderProvider>,
        cache: Arc<SummaryCache>,
    ) -> Self {
        let orders = OrderAggregator::new(Arc::clone(&order_provider));
        Self {
            billing,
            order_provider,
            orders,
            cache,
            metrics: None,
        }
    }

    /// Wire the HTTP provider clients and the cache from configuration.
    pub fn from_config(
        config: &Config,
        clock: Arc<dyn Clock>,
        metrics: MetricsCollector,
    ) -> Result<Self> {
        config.validate()?;
        let http = HttpUpstream::new(config.upstream.timeout())?;
        let billing = Arc::new(FinanceroClient::new(http.clone(), &config.financero)?);
        let order_provider = Arc::new(OderinoClient::new(http, &config.oderino)?);
        let cache = Arc::new(SummaryCache::new(config.cache.ttl(), clock));

        Ok(Self::new(billing, order_provider, cache)
            .with_order_concurrency(config.upstream.max_concurrent_orders)
            .with_metrics(metrics))
    }

    pub fn with_order_concurrency(mut self, concurrency: usize) -> Self {
        self.orders = self.orders.with_concurrency(concurrency);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.orders = self.orders.with_metrics(metrics.clone());
        self.metrics = Some(metrics);
        self
    }

    pub fn cache(&self) -> &Arc<SummaryCache> {
        &self.cache
    }

    /// The summary for `customer_id`: the cached one while fresh, otherwise a
    /// new aggregation run whose result replaces the cache entry.
    ///
    /// An aborted run returns the error and leaves the cache untouched.
    pub async fn summary(&self, customer_id: &str) -> Result<Arc<CustomerSummary>> {
        validate_identifier(customer_id)?;
        if let Some(metrics) = &self.metrics {
            metrics.record_request();
        }

        if let Some(cached) = self.cache.fresh(customer_id) {
            debug!(customer_id, "Serving summary from cache");
            if let Some(metrics) = &self.metrics {
                metrics.record_cache_hit();
            }
            return Ok(cached);
        }

        debug!(customer_id, "Cache miss");
        if let Some(metrics) = &self.metrics {
            metrics.record_cache_miss();
        }

        let summary = self.compute(customer_id).await?;
        Ok(self.cache.put(customer_id, summary))
    }

    /// Run one aggregation without consulting or writing the cache.
    pub async fn compute(&self, customer_id: &str) -> Result<CustomerSummary> {
        let run_id = Uuid::new_v4();
        let span = info_span!("summary", customer_id, %run_id);

        async move {
            let started = Instant::now();
            let result = self.run(customer_id).await;
            if let Some(metrics) = &self.metrics {
                metrics.observe_duration(started.elapsed().as_secs_f64());
            }

            match &result {
                Ok(summary) => info!(
                    warnings = summary.warnings.len(),
                    orders = summary.orders.as_ref().map_or(0, Vec::len),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Summary complete"
                ),
                Err(e) => {
                    warn!(error = %e, "Summary aborted");
                    if let Some(metrics) = &self.metrics {
                        metrics.record_abort();
                    }
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, customer_id: &str) -> Result<CustomerSummary> {
        let metrics = self.metrics.as_ref();

        let (address, billing_info, invoices, orders) = tokio::try_join!(
            async {
                let outcome = self.billing.address(customer_id).await;
                settle(metrics, Endpoint::Address, customer_id, outcome)
            },
            async {
                let outcome = self.billing.billing_info(customer_id).await;
                settle(metrics, Endpoint::BillingInfo, customer_id, outcome)
            },
            async {
                let outcome = self.billing.invoices(customer_id).await;
                settle(metrics, Endpoint::Invoices, customer_id, outcome)
            },
            self.order_branch(customer_id),
        )?;

        Ok(SummaryBuilder::new(customer_id)
            .address(address)
            .billing_info(billing_info)
            .invoices(invoices)
            .orders(orders)
            .build())
    }

    /// Orders listing, then enrichment of every listed order.
    async fn order_branch(&self, customer_id: &str) -> Result<Partial<OrderBatch>> {
        let outcome = self.order_provider.orders(customer_id).await;
        match settle(self.metrics.as_ref(), Endpoint::Orders, customer_id, outcome)? {
            Partial::Available(listing) => {
                let batch = self.orders.aggregate(listing).await?;
                Ok(Partial::Available(batch))
            }
            Partial::Degraded(message) => Ok(Partial::Degraded(message)),
        }
    }
}
