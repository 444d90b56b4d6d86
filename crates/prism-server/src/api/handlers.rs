use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use prism_core::validate_address;

use super::dto::*;
use crate::error::{AppError, AppResult};
use crate::sessions::SessionStatus;
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    println!("[REQUEST] GET /health");
    tracing::info!("Processing health check request");

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        network: state.config.mint.network.clone(),
        endpoints: state.indexer.helius().endpoints().len(),
        pending_mints: state.mint.pending_count().await,
        sessions: state.sessions.len().await,
    };

    println!("[RESPONSE] GET /health -> 200 OK endpoints={}", response.endpoints);
    Ok(Json(response))
}

pub async fn get_identity(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> AppResult<Json<IdentityResponse>> {
    let start = Instant::now();
    println!("[REQUEST] GET /api/v1/identity/{}", wallet);
    tracing::info!(wallet = %wallet, "Processing identity request");

    if validate_address(&wallet).is_err() {
        println!("[RESPONSE] GET /api/v1/identity/{} -> 400 Bad Request (invalid wallet)", wallet);
        return Err(AppError::InvalidWallet(wallet));
    }

    let snapshot = state.indexer.scan(&wallet, &CancellationToken::new()).await?;

    let duration = start.elapsed().as_millis();
    println!(
        "[RESPONSE] GET /api/v1/identity/{} -> 200 OK ({}ms) score={} tier={}",
        wallet, duration, snapshot.score, snapshot.tier
    );
    tracing::info!(
        wallet = %wallet,
        duration_ms = %duration,
        score = snapshot.score,
        tier = %snapshot.tier,
        "Identity snapshot returned"
    );

    Ok(Json(snapshot.into()))
}

pub async fn start_scan(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Json(request): Json<ScanRequest>,
) -> AppResult<(StatusCode, Json<ScanAccepted>)> {
    println!("[REQUEST] POST /api/v1/sessions/{}/scan address={}", session, request.address);
    tracing::info!(session = %session, wallet = %request.address, "Processing scan request");

    let address = request.address.trim().to_string();
    if validate_address(&address).is_err() {
        println!("[RESPONSE] POST /api/v1/sessions/{}/scan -> 400 Bad Request (invalid wallet)", session);
        return Err(AppError::InvalidWallet(address));
    }

    let generation = state
        .sessions
        .spawn_scan(state.indexer.clone(), session.clone(), address.clone())
        .await;

    println!("[RESPONSE] POST /api/v1/sessions/{}/scan -> 202 Accepted (generation {})", session, generation);
    Ok((
        StatusCode::ACCEPTED,
        Json(ScanAccepted {
            session,
            address,
            generation,
            status: "fetching".to_string(),
        }),
    ))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> AppResult<Json<SessionStatus>> {
    tracing::debug!(session = %session, "Processing session status request");
    Ok(Json(state.sessions.status(&session).await))
}

pub async fn prepare_mint(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> AppResult<Json<MintResponse>> {
    let start = Instant::now();
    println!("[REQUEST] POST /api/v1/mint/{}", wallet);
    tracing::info!(wallet = %wallet, "Processing mint preparation request");

    if validate_address(&wallet).is_err() {
        println!("[RESPONSE] POST /api/v1/mint/{} -> 400 Bad Request (invalid wallet)", wallet);
        return Err(AppError::InvalidWallet(wallet));
    }

    let snapshot = state.indexer.scan(&wallet, &CancellationToken::new()).await?;
    let request = state.mint.prepare(&snapshot).await?;

    println!(
        "[RESPONSE] POST /api/v1/mint/{} -> 200 OK ({}ms) request={}",
        wallet,
        start.elapsed().as_millis(),
        request.request_id
    );
    Ok(Json(MintResponse {
        request,
        expires_in_seconds: state.mint.ttl().num_seconds(),
    }))
}

pub async fn claim_mint(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> AppResult<Json<MintResponse>> {
    println!("[REQUEST] POST /api/v1/mint/claim/{}", request_id);
    tracing::info!(request_id = %request_id, "Processing mint claim");

    let request = state.mint.claim(&request_id).await?;

    println!("[RESPONSE] POST /api/v1/mint/claim/{} -> 200 OK wallet={}", request_id, request.address);
    Ok(Json(MintResponse {
        request,
        expires_in_seconds: 0,
    }))
}

pub async fn upload_metadata(
    State(state): State<AppState>,
    Json(upload): Json<MetadataUpload>,
) -> AppResult<Json<MetadataUploaded>> {
    println!("[REQUEST] POST /metadata");

    let metadata = upload
        .metadata
        .filter(|m| m.is_object())
        .ok_or_else(|| AppError::InvalidParam("Missing metadata payload".to_string()))?;
    let uri = state.storage.save_metadata(&metadata).await?;

    println!("[RESPONSE] POST /metadata -> 200 OK uri={}", uri);
    Ok(Json(MetadataUploaded { uri }))
}

pub async fn get_metadata(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    tracing::debug!(name = %name, "Serving metadata");
    Ok(Json(state.storage.read_metadata(&name).await?))
}

pub async fn upload_image(
    State(state): State<AppState>,
    Json(upload): Json<ImageUpload>,
) -> AppResult<Json<ImageUploaded>> {
    println!("[REQUEST] POST /assets");

    let image = upload
        .image
        .filter(|i| !i.trim().is_empty())
        .ok_or_else(|| AppError::InvalidParam("Missing image payload".to_string()))?;
    let url = state.storage.save_image(&image).await?;

    println!("[RESPONSE] POST /assets -> 200 OK url={}", url);
    Ok(Json(ImageUploaded { url }))
}

pub async fn get_asset(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Response> {
    tracing::debug!(name = %name, "Serving asset");
    let (bytes, content_type) = state.storage.read_asset(&name).await?;
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

/// Forward a JSON-RPC call to the ledger, keyed by `x-wallet-address`
pub async fn rpc_relay(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let seed = headers
        .get("x-wallet-address")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    tracing::debug!(seed = %seed, size = body.len(), "Relaying RPC request");

    let helius = state.indexer.helius();
    if helius.endpoints().is_empty() {
        return Err(AppError::Config("Helius API key required".to_string()));
    }

    let reply = helius
        .relay(&seed, body.to_vec())
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, [(header::CONTENT_TYPE, reply.content_type)], reply.body).into_response())
}
