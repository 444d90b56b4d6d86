use serde::{Deserialize, Serialize};
use serde_json::Value;

use prism_core::{MintRequest, TierLabel, WalletSnapshot, WalletTraits};

// ============================================================================
// GET /health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub network: String,
    pub endpoints: usize,
    pub pending_mints: usize,
    pub sessions: usize,
}

// ============================================================================
// GET /api/v1/identity/{wallet}
// ============================================================================

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub address: String,
    pub score: u32,
    pub tier: TierLabel,
    pub badges: Vec<String>,
    pub traits: WalletTraits,
}

impl From<WalletSnapshot> for IdentityResponse {
    fn from(snapshot: WalletSnapshot) -> Self {
        Self {
            badges: prism_core::badges(&snapshot.traits),
            address: snapshot.address,
            score: snapshot.score,
            tier: snapshot.tier,
            traits: snapshot.traits,
        }
    }
}

// ============================================================================
// POST /api/v1/sessions/{session}/scan
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct ScanAccepted {
    pub session: String,
    pub address: String,
    pub generation: u64,
    pub status: String,
}

// ============================================================================
// POST /api/v1/mint/{wallet}, POST /api/v1/mint/claim/{request_id}
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MintResponse {
    #[serde(flatten)]
    pub request: MintRequest,
    pub expires_in_seconds: i64,
}

// ============================================================================
// Metadata storage
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MetadataUpload {
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct MetadataUploaded {
    pub uri: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageUpload {
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImageUploaded {
    pub url: String,
}
