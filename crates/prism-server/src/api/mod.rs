pub mod dto;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Identity snapshots
        .route("/api/v1/identity/{wallet}", get(handlers::get_identity))
        .route("/api/v1/sessions/{session}/scan", post(handlers::start_scan))
        .route("/api/v1/sessions/{session}", get(handlers::get_session))
        // Mint staging
        .route("/api/v1/mint/claim/{request_id}", post(handlers::claim_mint))
        .route("/api/v1/mint/{wallet}", post(handlers::prepare_mint))
        // Metadata storage
        .route("/metadata", post(handlers::upload_metadata))
        .route("/metadata/{name}", get(handlers::get_metadata))
        .route("/assets", post(handlers::upload_image))
        .route("/assets/{name}", get(handlers::get_asset))
        // Ledger relay
        .route("/rpc", post(handlers::rpc_relay))
}
