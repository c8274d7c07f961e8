//! The composite customer summary and the merge of upstream results into it.

pub mod merge;

pub use merge::{OrderAssembly, SummaryBuilder};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The merged per-customer document returned to callers and cached.
///
/// Field order here is the serialized order. Absent fields serialize as
/// `null`; every gap left by a degraded upstream has a matching entry in
/// `warnings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer_id: String,
    pub company_name: Option<String>,
    pub address: Option<Value>,
    pub billing_info: Option<Map<String, Value>>,
    pub invoices: Option<Vec<Value>>,
    pub orders: Option<Vec<EnrichedOrder>>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl CustomerSummary {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            company_name: None,
            address: None,
            billing_info: None,
            invoices: None,
            orders: None,
            warnings: Vec::new(),
        }
    }
}

/// One order: the order-detail fields as returned upstream, plus jobs and
/// delivery when those calls succeeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedOrder {
    #[serde(flatten)]
    pub details: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Value>,
}

/// Enriched orders of one customer and the warnings collected on the way,
/// both in listing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBatch {
    pub orders: Vec<EnrichedOrder>,
    pub warnings: Vec<String>,
}
