//! Thin HTTP proxy server fronting the aggregation API and Solana RPC.
//!
//! Four endpoints, each responding with CORS headers permitting any origin:
//! `/api/getquote`, `/api/rpc/blockhash`, `/api/swap/instructions` and
//! `/api/swap/send-transaction`.

pub mod routes;
pub mod upstream;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;

/// Shared state for the proxy handlers.
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: Arc::new(config),
        }
    }
}

/// Build the proxy router with permissive CORS on every route.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/getquote",
            get(routes::get_quote)
                .options(options_ok)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/rpc/blockhash",
            post(routes::blockhash)
                .options(options_ok)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/swap/instructions",
            post(routes::swap_instructions)
                .options(options_ok)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/swap/send-transaction",
            post(routes::send_transaction)
                .options(options_ok)
                .fallback(method_not_allowed),
        )
        .layer(cors)
        .with_state(state)
}

async fn options_ok() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
