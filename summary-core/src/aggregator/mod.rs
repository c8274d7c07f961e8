//! Orchestration of the upstream calls behind one customer summary.
//!
//! Independent calls run concurrently and are joined before merging, so the
//! merged document and its warnings do not depend on completion order. The
//! first fatal outcome aborts the run and drops the calls still in flight.

pub mod orders;
pub mod summary;

#[cfg(test)]
mod fake;

pub use orders::{OrderAggregator, DEFAULT_ORDER_CONCURRENCY};
pub use summary::SummaryAggregator;

use crate::error::{Result, SummaryError};
use crate::observability::MetricsCollector;
use crate::upstream::{Endpoint, Partial, UpstreamOutcome};
use tracing::{info, warn};

/// Split a fatal outcome off as an error; keep the rest as a [`Partial`].
pub(crate) fn settle<T>(
    metrics: Option<&MetricsCollector>,
    endpoint: Endpoint,
    subject: &str,
    outcome: UpstreamOutcome<T>,
) -> Result<Partial<T>> {
    if let Some(metrics) = metrics {
        metrics.record_outcome(endpoint, outcome.kind());
    }

    match outcome {
        UpstreamOutcome::Ok(payload) => Ok(Partial::Available(payload)),
        UpstreamOutcome::Degraded(message) => {
            info!(%endpoint, subject, warning = %message, "Upstream degraded");
            Ok(Partial::Degraded(message))
        }
        UpstreamOutcome::Fatal(source) => {
            warn!(%endpoint, subject, error = %source, "Upstream failed");
            Err(SummaryError::Upstream {
                endpoint,
                subject: subject.to_string(),
                source,
            })
        }
    }
}
