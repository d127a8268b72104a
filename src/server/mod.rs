//! REST API surface
//!
//! One route turns a channel handle into a feed:
//! `GET /telegram/channel/{username}?format=rss|atom&exclude=a|b&exclude_case_sensitive=1&cache_ttl=60`
//!
//! Successful responses carry the syndication MIME type, a Cache-Control
//! header matching the request's TTL and an X-CACHE-STATUS header. Errors are
//! JSON payloads with a status code reflecting the error class.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::model::{CacheStatus, FeedParams};
use crate::pipeline::FeedService;
use crate::FeedError;

static CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache-status");

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FeedService>,
}

/// Builds the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/telegram/channel/:username", get(get_channel_feed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Raw query parameters; validated into `FeedParams` before use
#[derive(Debug, Deserialize)]
struct FeedQuery {
    format: Option<String>,
    exclude: Option<String>,
    exclude_case_sensitive: Option<String>,
    cache_ttl: Option<String>,
}

/// Handles requests for channel feeds
async fn get_channel_feed(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Response {
    let params = match FeedParams::from_query(
        &username,
        query.format.as_deref(),
        query.exclude.as_deref(),
        query.exclude_case_sensitive.as_deref(),
        query.cache_ttl.as_deref(),
    ) {
        Ok(params) => params,
        Err(error) => return error_response(&error),
    };

    match state.service.serve(&params).await {
        Ok((content, cache_status)) => feed_response(content, &params, cache_status),
        Err(error) => error_response(&error),
    }
}

/// Builds a successful feed response with caching headers
fn feed_response(content: Vec<u8>, params: &FeedParams, cache_status: CacheStatus) -> Response {
    let cache_control = if params.cache_ttl_minutes > 0 {
        format!(
            "public, max-age={}",
            params.cache_ttl_minutes.saturating_mul(60)
        )
    } else {
        "no-cache".to_string()
    };

    (
        [
            (
                header::CONTENT_TYPE,
                format!("{}; charset=utf-8", params.format.mime_type()),
            ),
            (header::CACHE_CONTROL, cache_control),
            (
                CACHE_STATUS_HEADER.clone(),
                cache_status.as_str().to_string(),
            ),
        ],
        content,
    )
        .into_response()
}

/// Maps an error to its HTTP representation
fn error_response(error: &FeedError) -> Response {
    let status = match error {
        FeedError::Validation(_) => StatusCode::BAD_REQUEST,
        FeedError::Fetch { .. } | FeedError::Timeout { .. } | FeedError::Document { .. } => {
            StatusCode::BAD_GATEWAY
        }
        FeedError::Format { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    tracing::error!(status = %status, error = %error, "Request failed");

    (
        status,
        Json(serde_json::json!({ "error": error.to_string() })),
    )
        .into_response()
}

/// Waits for SIGINT or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %error, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    {
        let mut terminate =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(error) => {
                    tracing::error!(error = %error, "Failed to install SIGTERM handler");
                    return ctrl_c.await;
                }
            };

        tokio::select! {
            _ = ctrl_c => {}
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    tracing::info!("Shutdown signal received");
}
