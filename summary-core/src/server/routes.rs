use super::AppState;
use crate::error::SummaryError;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Prefix of the plain-text body returned when a run is aborted.
pub const UPSTREAM_FAILURE_PREFIX: &str = "Unable to reach API. \n Exception raised: \n";

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/customers/{customer_id}/summary", get(customer_summary))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn customer_summary(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Response, SummaryError> {
    let summary = state.aggregator.summary(&customer_id).await?;
    let body = serde_json::to_vec(&*summary)?;

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics(State(state): State<AppState>) -> Result<Response, SummaryError> {
    let text = state.metrics.export()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        text,
    )
        .into_response())
}

impl IntoResponse for SummaryError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            SummaryError::Upstream { .. } => (
                StatusCode::BAD_REQUEST,
                format!("{}{}", UPSTREAM_FAILURE_PREFIX, self),
            ),
            SummaryError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            _ => {
                error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
    }
}
