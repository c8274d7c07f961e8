//! Upstream provider clients.
//!
//! Every call answers with an [`UpstreamOutcome`]: the payload, a degraded
//! message taken from a well-formed error response, or a fatal transport
//! error. Callers branch on the outcome, never on status codes.

pub mod financero;
pub mod http;
pub mod oderino;
pub mod types;

pub use financero::FinanceroClient;
pub use http::{classify, HttpUpstream};
pub use oderino::OderinoClient;
pub use types::*;

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The upstream endpoints the aggregation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Address,
    BillingInfo,
    Invoices,
    Orders,
    OrderDetails,
    OrderJobs,
    OrderDelivery,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Address => "address",
            Endpoint::BillingInfo => "billing_info",
            Endpoint::Invoices => "invoices",
            Endpoint::Orders => "orders",
            Endpoint::OrderDetails => "order_details",
            Endpoint::OrderJobs => "order_jobs",
            Endpoint::OrderDelivery => "order_delivery",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level failure of a single upstream call.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("{url} answered {status} without an error payload")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("cannot build request URL from {base}")]
    InvalidUrl { base: String },

    #[error("refusing path segment {segment:?} under {base}")]
    InvalidSegment { base: String, segment: String },
}

/// Result of one upstream call.
#[derive(Debug)]
pub enum UpstreamOutcome<T> {
    Ok(T),
    Degraded(String),
    Fatal(UpstreamError),
}

/// Label for an outcome, used in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Ok,
    Degraded,
    Fatal,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Ok => "ok",
            OutcomeKind::Degraded => "degraded",
            OutcomeKind::Fatal => "fatal",
        }
    }
}

impl<T> UpstreamOutcome<T> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            UpstreamOutcome::Ok(_) => OutcomeKind::Ok,
            UpstreamOutcome::Degraded(_) => OutcomeKind::Degraded,
            UpstreamOutcome::Fatal(_) => OutcomeKind::Fatal,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UpstreamOutcome<U> {
        match self {
            UpstreamOutcome::Ok(value) => UpstreamOutcome::Ok(f(value)),
            UpstreamOutcome::Degraded(message) => UpstreamOutcome::Degraded(message),
            UpstreamOutcome::Fatal(err) => UpstreamOutcome::Fatal(err),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, UpstreamOutcome::Fatal(_))
    }
}

/// A recoverable outcome: what is left once fatal outcomes have been split off.
#[derive(Debug, Clone, PartialEq)]
pub enum Partial<T> {
    Available(T),
    Degraded(String),
}

/// Provider A: customer address, billing info and invoices.
#[async_trait]
pub trait BillingProvider: Send + Sync {
    async fn address(&self, customer_id: &str) -> UpstreamOutcome<AddressPayload>;

    async fn billing_info(&self, customer_id: &str) -> UpstreamOutcome<BillingInfoPayload>;

    async fn invoices(&self, customer_id: &str) -> UpstreamOutcome<InvoicesPayload>;
}

/// Provider B: order listing and per-order details, jobs and delivery.
#[async_trait]
pub trait OrderProvider: Send + Sync {
    async fn orders(&self, customer_id: &str) -> UpstreamOutcome<OrdersPayload>;

    async fn order_details(&self, order_id: &str) -> UpstreamOutcome<OrderDetailsPayload>;

    async fn order_jobs(&self, order_id: &str) -> UpstreamOutcome<JobsPayload>;

    async fn order_delivery(&self, order_id: &str) -> UpstreamOutcome<DeliveryPayload>;
}
