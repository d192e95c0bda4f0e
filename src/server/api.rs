//! HTTP API for the tiered cache.
//!
//! Thin layer over the tier manager:
//! - POST /put/{key}: body is the opaque payload
//! - GET /get/{key}: returns the payload, 404 on a total miss
//! - GET /health
//! - GET /cache/stats

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use thiserror::Error;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::manager::{MigrationStats, SharedTierManager, TierStats};
use crate::cache::CacheError;
use crate::config::Config;

/// Application state shared across handlers.
pub struct AppState {
    pub manager: SharedTierManager<Bytes>,
    pub config: Arc<Config>,
    pub start_time: Instant,
}

/// Build the axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let max_in_flight = state.config.server.max_concurrent_requests;

    Router::new()
        .route("/put/{key}", post(put_value))
        .route("/get/{key}", get(get_value))
        .route("/health", get(health))
        .route("/cache/stats", get(cache_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(GlobalConcurrencyLimitLayer::new(max_in_flight))
        .with_state(state)
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Cache(CacheError::PayloadTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Cache(CacheError::InvalidConfiguration(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

// ─── Request/Response Types ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct PutResponse {
    pub status: String,
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub error: String,
    pub key: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStatsResponse,
}

/// Cache statistics response.
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub total_entries: usize,
    pub tiers: Vec<TierStats>,
    pub migrations: MigrationStats,
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn put_value(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<PutResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let limits = &state.config.limits;

    if key.len() > limits.max_key_bytes {
        return Err(CacheError::PayloadTooLarge {
            what: "key",
            actual: key.len(),
            limit: limits.max_key_bytes,
        }
        .into());
    }
    if body.len() > limits.max_value_bytes {
        return Err(CacheError::PayloadTooLarge {
            what: "value",
            actual: body.len(),
            limit: limits.max_value_bytes,
        }
        .into());
    }

    info!(
        request_id = %request_id,
        key,
        bytes = body.len(),
        "Put request"
    );

    state.manager.write().await.put(key.clone(), body);

    Ok(Json(PutResponse {
        status: "ok".to_string(),
        key,
    }))
}

async fn get_value(State(state): State<Arc<AppState>>, Path(key): Path<String>) -> Response {
    let request_id = Uuid::new_v4();

    // Promotion mutates two stores, so the read path takes the write guard.
    let value = state.manager.write().await.get(&key);

    debug!(
        request_id = %request_id,
        key,
        found = value.is_some(),
        "Get request"
    );

    match value {
        Some(value) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            value,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(NotFoundResponse {
                error: "not found".to_string(),
                key,
            }),
        )
            .into_response(),
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let manager = state.manager.read().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        cache: CacheStatsResponse {
            total_entries: manager.total_entries(),
            tiers: manager.tier_stats().to_vec(),
            migrations: manager.migration_stats(),
        },
    })
}

async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    let manager = state.manager.read().await;

    Json(CacheStatsResponse {
        total_entries: manager.total_entries(),
        tiers: manager.tier_stats().to_vec(),
        migrations: manager.migration_stats(),
    })
}
