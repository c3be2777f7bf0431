use crate::collector::Collector;
use crate::metrics::{encode, TEXT_FORMAT};
use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::error;

/// Scrape endpoint: runs one collection cycle and renders it.
pub async fn metrics(
    State(collector): State<Arc<Collector>>,
) -> Result<impl IntoResponse, StatusCode> {
    let families = collector.collect().await.map_err(|e| {
        error!(error = %e, "failed building metric families");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let body = encode(&families).map_err(|e| {
        error!(error = %e, "failed encoding metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(([(header::CONTENT_TYPE, TEXT_FORMAT)], body))
}
