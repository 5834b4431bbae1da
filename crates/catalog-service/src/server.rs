//! HTTP server exposing catalog operations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use catalog_client::{CacheInfo, CatalogError, ProductService};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared state for the HTTP server
pub struct ServerState {
    pub service: ProductService,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(service: ProductService) -> Self {
        Self {
            service,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    uptime_secs: u64,
    cache: CacheInfo,
}

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/products/{endpoint}", get(get_products))
        .route("/cache", get(cache_info).delete(clear_cache))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(state: SharedState, port: u16) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await
}

async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: state.service.cache_info().await,
    })
}

/// Products for a category, or the click-ranked list for `hot`
async fn get_products(
    State(state): State<SharedState>,
    Path(endpoint): Path<String>,
) -> Response {
    match state.service.fetch_products(&endpoint).await {
        Ok(products) => Json(products.as_ref()).into_response(),
        Err(e) => {
            tracing::error!(endpoint = %endpoint, error = %e, cause = %e.cause(), "Fetch products failed");
            let status = match e {
                CatalogError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                CatalogError::Network(_) | CatalogError::Loading(_) => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn cache_info(State(state): State<SharedState>) -> Json<CacheInfo> {
    Json(state.service.cache_info().await)
}

async fn clear_cache(State(state): State<SharedState>) -> StatusCode {
    state.service.clear_cache().await;
    info!("Cache cleared");
    StatusCode::NO_CONTENT
}
