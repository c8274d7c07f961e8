//! Response payloads of the upstream endpoints.
//!
//! Redundant identifier fields (`customer_id`, `order_id`) are captured in
//! dedicated fields and never reach the flattened remainder that gets merged.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

/// `GET {financero}/customers/{id}/address`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddressPayload {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub address: Option<Value>,
}

/// `GET {financero}/customers/{id}/billing-info`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BillingInfoPayload {
    #[serde(default)]
    pub customer_id: Option<Value>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// `GET {financero-invoices}/customers/{id}/invoices`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InvoicesPayload {
    #[serde(default)]
    pub customer_id: Option<Value>,
    pub invoices: Vec<Value>,
}

/// `GET {oderino}/customers/{id}/orders`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrdersPayload {
    #[serde(default)]
    pub customer_id: Option<Value>,
    #[serde(default)]
    pub orders: Vec<OrderStub>,
}

/// One entry of the orders listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderStub {
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
}

impl OrderStub {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
        }
    }
}

/// `GET {oderino-orders}/orders/{order_id}`, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct OrderDetailsPayload {
    pub fields: Map<String, Value>,
}

/// `GET {oderino-orders}/orders/{order_id}/jobs`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobsPayload {
    #[serde(default)]
    pub order_id: Option<Value>,
    #[serde(flatten)]
    pub jobs: Map<String, Value>,
}

/// `GET {oderino-delivery}/orders/{order_id}/delivery`. The useful part is
/// wrapped in a `delivery` envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeliveryPayload {
    #[serde(default)]
    pub order_id: Option<Value>,
    pub delivery: Value,
}

/// Body of a non-200 upstream response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub error: Value,
}

impl ErrorPayload {
    pub(crate) fn message(self) -> String {
        match self.error {
            Value::String(message) => message,
            other => other.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
