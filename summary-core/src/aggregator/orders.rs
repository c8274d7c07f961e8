use super::settle;
use crate::composer::{EnrichedOrder, OrderAssembly, OrderBatch};
use crate::error::Result;
use crate::observability::MetricsCollector;
use crate::upstream::{Endpoint, OrderProvider, OrdersPayload};
use futures::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::debug;

/// Orders enriched concurrently unless configured otherwise.
pub const DEFAULT_ORDER_CONCURRENCY: usize = 8;

/// Enriches an order listing with per-order details, jobs and delivery.
#[derive(Clone)]
pub struct OrderAggregator {
    provider: Arc<dyn OrderProvider>,
    concurrency: usize,
    metrics: Option<MetricsCollector>,
}

impl OrderAggregator {
    pub fn new(provider: Arc<dyn OrderProvider>) -> Self {
        Self {
            provider,
            concurrency: DEFAULT_ORDER_CONCURRENCY,
            metrics: None,
        }
    }

    /// Maximum number of orders enriched at the same time (at least one).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Enrich every order of the listing, keeping listing order for both the
    /// orders and their warnings. The first fatal outcome aborts the batch.
    pub async fn aggregate(&self, listing: OrdersPayload) -> Result<OrderBatch> {
        debug!(orders = listing.orders.len(), concurrency = self.concurrency, "Aggregating orders");

        let this = self;
        let enriched: Vec<(EnrichedOrder, Vec<String>)> = stream::iter(listing.orders)
            .map(move |stub| this.enrich(stub.order_id))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut batch = OrderBatch::default();
        for (order, warnings) in enriched {
            batch.orders.push(order);
            batch.warnings.extend(warnings);
        }
        Ok(batch)
    }

    async fn enrich(&self, order_id: String) -> Result<(EnrichedOrder, Vec<String>)> {
        let metrics = self.metrics.as_ref();
        let order_id = order_id.as_str();

        let (details, jobs, delivery) = tokio::try_join!(
            async {
                let outcome = self.provider.order_details(order_id).await;
                settle(metrics, Endpoint::OrderDetails, order_id, outcome)
            },
            async {
                let outcome = self.provider.order_jobs(order_id).await;
                settle(metrics, Endpoint::OrderJobs, order_id, outcome)
            },
            async {
                let outcome = self.provider.order_delivery(order_id).await;
                settle(metrics, Endpoint::OrderDelivery, order_id, outcome)
            },
        )?;

        Ok(OrderAssembly::new()
            .details(details)
            .jobs(jobs)
            .delivery(delivery)
            .finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::fake::{FakeUpstream, Reply};
    use crate::error::SummaryError;
    use crate::upstream::OrderStub;
    use serde_json::json;

    fn listing(ids: &[&str]) -> OrdersPayload {
        OrdersPayload {
            customer_id: None,
            orders: ids.iter().map(|id| OrderStub::new(*id)).collect(),
        }
    }

    fn healthy_order(fake: FakeUpstream, id: &str) -> FakeUpstream {
        fake.reply(Endpoint::OrderDetails, id, Reply::Ok(json!({"order_id": id, "status": "open"})))
            .reply(Endpoint::OrderJobs, id, Reply::Ok(json!({"order_id": id, "jobs": []})))
            .reply(
                Endpoint::OrderDelivery,
                id,
                Reply::Ok(json!({"order_id": id, "delivery": {"carrier": "UPS"}})),
            )
    }

    #[tokio::test]
    async fn test_orders_keep_listing_order_under_reversed_completion() {
        let fake = FakeUpstream::new()
            .reply(Endpoint::OrderDetails, "O1", Reply::Ok(json!({"order_id": "O1"})).after(60))
            .reply(Endpoint::OrderJobs, "O1", Reply::Degraded("O1 jobs down").after(60))
            .reply(Endpoint::OrderDelivery, "O1", Reply::Degraded("O1 delivery down"))
            .reply(Endpoint::OrderDetails, "O2", Reply::Ok(json!({"order_id": "O2"})))
            .reply(Endpoint::OrderJobs, "O2", Reply::Degraded("O2 jobs down"))
            .reply(Endpoint::OrderDelivery, "O2", Reply::Ok(json!({"delivery": {}})));
        let aggregator = OrderAggregator::new(Arc::new(fake));

        let batch = aggregator.aggregate(listing(&["O1", "O2"])).await.unwrap();

        let ids: Vec<&serde_json::Value> = batch.orders.iter().map(|o| &o.details["order_id"]).collect();
        assert_eq!(ids, vec!["O1", "O2"]);
        assert_eq!(
            batch.warnings,
            vec!["O1 jobs down", "O1 delivery down", "O2 jobs down"]
        );
        assert!(batch.orders[1].delivery.is_some());
    }

    #[tokio::test]
    async fn test_degraded_details_still_attaches_jobs_and_delivery() {
        let fake = FakeUpstream::new()
            .reply(Endpoint::OrderDetails, "O1", Reply::Degraded("order not found"))
            .reply(Endpoint::OrderJobs, "O1", Reply::Ok(json!({"order_id": "O1", "jobs": [1]})))
            .reply(
                Endpoint::OrderDelivery,
                "O1",
                Reply::Ok(json!({"order_id": "O1", "delivery": {"eta": "tomorrow"}})),
            );
        let aggregator = OrderAggregator::new(Arc::new(fake));

        let batch = aggregator.aggregate(listing(&["O1"])).await.unwrap();

        let order = &batch.orders[0];
        assert!(order.details.is_empty());
        assert_eq!(order.jobs.as_ref().unwrap()["jobs"], json!([1]));
        assert_eq!(order.delivery, Some(json!({"eta": "tomorrow"})));
        assert_eq!(batch.warnings, vec!["order not found"]);
    }

    #[tokio::test]
    async fn test_fatal_order_call_aborts_batch() {
        let fake = healthy_order(FakeUpstream::new(), "O1")
            .reply(Endpoint::OrderDetails, "O2", Reply::Ok(json!({"order_id": "O2"})))
            .reply(Endpoint::OrderJobs, "O2", Reply::Ok(json!({"jobs": []})))
            .reply(Endpoint::OrderDelivery, "O2", Reply::Fatal);
        let aggregator = OrderAggregator::new(Arc::new(fake));

        let err = aggregator.aggregate(listing(&["O1", "O2"])).await.unwrap_err();

        match err {
            SummaryError::Upstream { endpoint, subject, .. } => {
                assert_eq!(endpoint, Endpoint::OrderDelivery);
                assert_eq!(subject, "O2");
            }
            other => panic!("expected upstream abort, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrency_limit_of_one_is_sequential() {
        let fake = Arc::new(healthy_order(healthy_order(FakeUpstream::new(), "O1"), "O2"));
        let aggregator = OrderAggregator::new(fake.clone()).with_concurrency(0);

        let batch = aggregator.aggregate(listing(&["O1", "O2"])).await.unwrap();
        assert_eq!(batch.orders.len(), 2);

        let order_of_calls: Vec<String> = fake.calls().into_iter().map(|(_, id)| id).collect();
        assert_eq!(order_of_calls, vec!["O1", "O1", "O1", "O2", "O2", "O2"]);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let aggregator = OrderAggregator::new(Arc::new(FakeUpstream::new()));
        let batch = aggregator.aggregate(listing(&[])).await.unwrap();
        assert_eq!(batch, OrderBatch::default());
    }
}
