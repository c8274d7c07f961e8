//! HTTP boundary around the aggregator.

pub mod routes;

pub use routes::{create_routes, UPSTREAM_FAILURE_PREFIX};

use crate::aggregator::SummaryAggregator;
use crate::error::Result;
use crate::observability::MetricsCollector;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<SummaryAggregator>,
    pub metrics: MetricsCollector,
}

impl AppState {
    pub fn new(aggregator: Arc<SummaryAggregator>, metrics: MetricsCollector) -> Self {
        Self {
            aggregator,
            metrics,
        }
    }
}

/// Serve until Ctrl-C. In-flight requests are allowed to finish.
pub async fn serve(bind: &str, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!("Summary service listening on http://{}", addr);

    axum::serve(listener, create_routes(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Summary service stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C signal, shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await
        }
    }
}
