//! In-memory providers for aggregation tests.

use crate::upstream::*;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Ok(Value),
    Degraded(&'static str),
    Fatal,
    Delayed(u64, Box<Reply>),
}

impl Reply {
    pub(crate) fn after(self, millis: u64) -> Reply {
        Reply::Delayed(millis, Box::new(self))
    }
}

#[derive(Default)]
pub(crate) struct FakeUpstream {
    replies: HashMap<(Endpoint, String), Reply>,
    calls: Mutex<Vec<(Endpoint, String)>>,
    completed: Mutex<Vec<(Endpoint, String)>>,
}

impl FakeUpstream {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, endpoint: Endpoint, subject: &str, reply: Reply) -> Self {
        self.replies.insert((endpoint, subject.to_string()), reply);
        self
    }

    pub(crate) fn calls(&self) -> Vec<(Endpoint, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn completed(&self) -> Vec<(Endpoint, String)> {
        self.completed.lock().unwrap().clone()
    }

    async fn respond<T: DeserializeOwned>(&self, endpoint: Endpoint, subject: &str) -> UpstreamOutcome<T> {
        let key = (endpoint, subject.to_string());
        self.calls.lock().unwrap().push(key.clone());
        let mut reply = self
            .replies
            .get(&key)
            .cloned()
            .unwrap_or_else(|| panic!("no reply configured for {} {}", endpoint, subject));

        let url = format!("fake://{}/{}", endpoint, subject);
        let outcome = loop {
            match reply {
                Reply::Delayed(millis, inner) => {
                    tokio::time::sleep(Duration::from_millis(millis)).await;
                    reply = *inner;
                }
                Reply::Ok(value) => {
                    break match serde_json::from_value(value) {
                        Ok(payload) => UpstreamOutcome::Ok(payload),
                        Err(e) => UpstreamOutcome::Fatal(UpstreamError::MalformedResponse {
                            url,
                            reason: e.to_string(),
                        }),
                    };
                }
                Reply::Degraded(message) => break UpstreamOutcome::Degraded(message.to_string()),
                Reply::Fatal => {
                    break UpstreamOutcome::Fatal(UpstreamError::Timeout {
                        url,
                        timeout: Duration::from_secs(5),
                    })
                }
            }
        };

        self.completed.lock().unwrap().push(key);
        outcome
    }
}

#[async_trait]
impl BillingProvider for FakeUpstream {
    async fn address(&self, customer_id: &str) -> UpstreamOutcome<AddressPayload> {
        self.respond(Endpoint::Address, customer_id).await
    }

    async fn billing_info(&self, customer_id: &str) -> UpstreamOutcome<BillingInfoPayload> {
        self.respond(Endpoint::BillingInfo, customer_id).await
    }

    async fn invoices(&self, customer_id: &str) -> UpstreamOutcome<InvoicesPayload> {
        self.respond(Endpoint::Invoices, customer_id).await
    }
}

#[async_trait]
impl OrderProvider for FakeUpstream {
    async fn orders(&self, customer_id: &str) -> UpstreamOutcome<OrdersPayload> {
        self.respond(Endpoint::Orders, customer_id).await
    }

    async fn order_details(&self, order_id: &str) -> UpstreamOutcome<OrderDetailsPayload> {
        self.respond(Endpoint::OrderDetails, order_id).await
    }

    async fn order_jobs(&self, order_id: &str) -> UpstreamOutcome<JobsPayload> {
        self.respond(Endpoint::OrderJobs, order_id).await
    }

    async fn order_delivery(&self, order_id: &str) -> UpstreamOutcome<DeliveryPayload> {
        self.respond(Endpoint::OrderDelivery, order_id).await
    }
}
