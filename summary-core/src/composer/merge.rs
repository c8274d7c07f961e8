use super::{CustomerSummary, EnrichedOrder, OrderBatch};
use crate::upstream::{
    AddressPayload, BillingInfoPayload, DeliveryPayload, InvoicesPayload, JobsPayload,
    OrderDetailsPayload, Partial,
};

/// Take the payload out of a partial result, or record its warning.
fn absorb<T>(warnings: &mut Vec<String>, part: Partial<T>) -> Option<T> {
    match part {
        Partial::Available(payload) => Some(payload),
        Partial::Degraded(message) => {
            warnings.push(message);
            None
        }
    }
}

/// Merges the top-level results of one aggregation run.
///
/// Results are consumed address, billing info, invoices, orders; warnings
/// follow that order no matter which upstream answered first.
#[derive(Debug)]
pub struct SummaryBuilder {
    summary: CustomerSummary,
}

impl SummaryBuilder {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            summary: CustomerSummary::new(customer_id),
        }
    }

    pub fn address(mut self, part: Partial<AddressPayload>) -> Self {
        if let Some(payload) = absorb(&mut self.summary.warnings, part) {
            self.summary.company_name = payload.company_name;
            self.summary.address = payload.address;
        }
        self
    }

    pub fn billing_info(mut self, part: Partial<BillingInfoPayload>) -> Self {
        if let Some(payload) = absorb(&mut self.summary.warnings, part) {
            self.summary.billing_info = Some(payload.details);
        }
        self
    }

    pub fn invoices(mut self, part: Partial<InvoicesPayload>) -> Self {
        if let Some(payload) = absorb(&mut self.summary.warnings, part) {
            self.summary.invoices = Some(payload.invoices);
        }
        self
    }

    pub fn orders(mut self, part: Partial<OrderBatch>) -> Self {
        if let Some(batch) = absorb(&mut self.summary.warnings, part) {
            self.summary.orders = Some(batch.orders);
            self.summary.warnings.extend(batch.warnings);
        }
        self
    }

    pub fn build(self) -> CustomerSummary {
        self.summary
    }
}

/// Merges the details, jobs and delivery results of one order.
///
/// A degraded details call leaves an empty base record; jobs and delivery
/// still attach to it.
#[derive(Debug, Default)]
pub struct OrderAssembly {
    order: EnrichedOrder,
    warnings: Vec<String>,
}

impl OrderAssembly {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn details(mut self, part: Partial<OrderDetailsPayload>) -> Self {
        if let Some(payload) = absorb(&mut self.warnings, part) {
            self.order.details = payload.fields;
        }
        self
    }

    pub fn jobs(mut self, part: Partial<JobsPayload>) -> Self {
        if let Some(payload) = absorb(&mut self.warnings, part) {
            self.order.jobs = Some(payload.jobs);
        }
        self
    }

    pub fn delivery(mut self, part: Partial<DeliveryPayload>) -> Self {
        if let Some(payload) = absorb(&mut self.warnings, part) {
            self.order.delivery = Some(payload.delivery);
        }
        self
    }

    pub fn finish(mut self) -> (EnrichedOrder, Vec<String>) {
        // Attached sub-documents replace same-named detail fields.
        if self.order.jobs.is_some() {
            self.order.details.shift_remove("jobs");
        }
        if self.order.delivery.is_some() {
            self.order.details.shift_remove("delivery");
        }
        (self.order, self.warnings)
    }
}
