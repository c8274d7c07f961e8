use super::http::{endpoint_url, HttpUpstream};
use super::{
    AddressPayload, BillingInfoPayload, BillingProvider, Endpoint, InvoicesPayload,
    UpstreamOutcome,
};
use crate::config::FinanceroConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Url;

/// Client for the Financero billing provider.
///
/// Address and billing info live under the v1 API, invoices under a
/// separately versioned base URL.
#[derive(Debug, Clone)]
pub struct FinanceroClient {
    http: HttpUpstream,
    base_url: Url,
    invoices_url: Url,
}

impl FinanceroClient {
    pub fn new(http: HttpUpstream, config: &FinanceroConfig) -> Result<Self> {
        Ok(Self {
            http,
            base_url: config.base_url()?,
            invoices_url: config.invoices_url()?,
        })
    }

    async fn customer_resource<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        base: &Url,
        customer_id: &str,
        resource: &str,
    ) -> UpstreamOutcome<T> {
        match endpoint_url(base, &["customers", customer_id, resource]) {
            Ok(url) => self.http.get_json(endpoint, url).await,
            Err(e) => UpstreamOutcome::Fatal(e),
        }
    }
}

#[async_trait]
impl BillingProvider for FinanceroClient {
    async fn address(&self, customer_id: &str) -> UpstreamOutcome<AddressPayload> {
        self.customer_resource(Endpoint::Address, &self.base_url, customer_id, "address")
            .await
    }

    async fn billing_info(&self, customer_id: &str) -> UpstreamOutcome<BillingInfoPayload> {
        self.customer_resource(
            Endpoint::BillingInfo,
            &self.base_url,
            customer_id,
            "billing-info",
        )
        .await
    }

    async fn invoices(&self, customer_id: &str) -> UpstreamOutcome<InvoicesPayload> {
        self.customer_resource(Endpoint::Invoices, &self.invoices_url, customer_id, "invoices")
            .await
    }
}
