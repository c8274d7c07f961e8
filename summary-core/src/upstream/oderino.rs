use super::http::{endpoint_url, HttpUpstream};
use super::{
    DeliveryPayload, Endpoint, JobsPayload, OrderDetailsPayload, OrderProvider, OrdersPayload,
    UpstreamOutcome,
};
use crate::config::OderinoConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

/// Client for the Oderino order provider.
///
/// The customer's order listing, the order details/jobs and the delivery
/// data are served from three different base URLs.
#[derive(Debug, Clone)]
pub struct OderinoClient {
    http: HttpUpstream,
    base_url: Url,
    orders_url: Url,
    delivery_url: Url,
}

impl OderinoClient {
    pub fn new(http: HttpUpstream, config: &OderinoConfig) -> Result<Self> {
        Ok(Self {
            http,
            base_url: config.base_url()?,
            orders_url: config.orders_url()?,
            delivery_url: config.delivery_url()?,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        base: &Url,
        segments: &[&str],
    ) -> UpstreamOutcome<T> {
        match endpoint_url(base, segments) {
            Ok(url) => self.http.get_json(endpoint, url).await,
            Err(e) => UpstreamOutcome::Fatal(e),
        }
    }
}

#[async_trait]
impl OrderProvider for OderinoClient {
    async fn orders(&self, customer_id: &str) -> UpstreamOutcome<OrdersPayload> {
        self.fetch(Endpoint::Orders, &self.base_url, &["customers", customer_id, "orders"])
            .await
    }

    async fn order_details(&self, order_id: &str) -> UpstreamOutcome<OrderDetailsPayload> {
        self.fetch(Endpoint::OrderDetails, &self.orders_url, &["orders", order_id])
            .await
    }

    async fn order_jobs(&self, order_id: &str) -> UpstreamOutcome<JobsPayload> {
        self.fetch(Endpoint::OrderJobs, &self.orders_url, &["orders", order_id, "jobs"])
            .await
    }

    async fn order_delivery(&self, order_id: &str) -> UpstreamOutcome<DeliveryPayload> {
        self.fetch(
            Endpoint::OrderDelivery,
            &self.delivery_url,
            &["orders", order_id, "delivery"],
        )
        .await
    }
}
