use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use prism_core::{metadata_document, ExpiringStore, MintBranding, MintRequest, WalletSnapshot};

use crate::error::{AppError, AppResult};
use crate::storage::MetadataStore;

/// Prepares mint requests and holds them until the minter claims them
#[derive(Clone)]
pub struct MintDesk {
    branding: MintBranding,
    storage: MetadataStore,
    ttl: chrono::Duration,
    pending: Arc<Mutex<ExpiringStore<String, MintRequest>>>,
}

impl MintDesk {
    pub fn new(branding: MintBranding, storage: MetadataStore, ttl: chrono::Duration) -> Self {
        Self {
            branding,
            storage,
            ttl,
            pending: Arc::new(Mutex::new(ExpiringStore::new(ttl))),
        }
    }

    /// Store the card metadata and stage a claimable mint request
    pub async fn prepare(&self, snapshot: &WalletSnapshot) -> AppResult<MintRequest> {
        if !snapshot.is_ready() {
            return Err(AppError::InvalidParam("Cannot mint a failed snapshot".to_string()));
        }
        if self.branding.image_url.trim().is_empty() {
            return Err(AppError::Config("mint.image_url is not configured".to_string()));
        }

        let document = metadata_document(snapshot, &self.branding);
        let document = serde_json::to_value(&document)
            .map_err(|e| AppError::Internal(format!("Failed to encode metadata: {e}")))?;
        let metadata_uri = self.storage.save_metadata(&document).await?;

        let now = Utc::now();
        let request = MintRequest::new(
            Uuid::new_v4().to_string(),
            snapshot,
            &self.branding,
            metadata_uri,
            now,
        );

        self.pending
            .lock()
            .await
            .put(request.request_id.clone(), request.clone(), now);

        tracing::info!(
            wallet = %request.address,
            request_id = %request.request_id,
            tier = %request.tier,
            "Mint request staged"
        );
        Ok(request)
    }

    /// Hand a staged request to the minter. Each request can be claimed once.
    pub async fn claim(&self, request_id: &str) -> AppResult<MintRequest> {
        self.pending
            .lock()
            .await
            .take(&request_id.to_string(), Utc::now())
            .ok_or_else(|| AppError::NotFound(format!("Mint request {request_id}")))
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    pub async fn prune(&self) -> usize {
        self.pending.lock().await.prune(Utc::now())
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Periodically drop expired requests
    pub fn spawn_pruner(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let desk = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = desk.prune().await;
                if removed > 0 {
                    tracing::debug!(removed, "Pruned expired mint requests");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{ErrorKind, TierLabel, WalletTraits};
    use tempfile::TempDir;

    fn branding() -> MintBranding {
        MintBranding {
            collection: "Identity Prism".to_string(),
            symbol: "PRISM".to_string(),
            network: "devnet".to_string(),
            image_url: "https://cdn.test/prism.png".to_string(),
            app_base_url: None,
        }
    }

    fn snapshot() -> WalletSnapshot {
        WalletSnapshot {
            address: "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin".to_string(),
            score: 420,
            tier: TierLabel::Earth,
            traits: WalletTraits::default(),
            error: None,
        }
    }

    async fn desk(ttl: chrono::Duration) -> (TempDir, MintDesk) {
        let dir = TempDir::new().unwrap();
        let storage = MetadataStore::new(dir.path(), "https://meta.test");
        storage.init().await.unwrap();
        (dir, MintDesk::new(branding(), storage, ttl))
    }

    #[tokio::test]
    async fn test_prepare_then_claim_once() {
        let (_dir, desk) = desk(chrono::Duration::minutes(10)).await;
        let request = desk.prepare(&snapshot()).await.unwrap();
        assert_eq!(request.tier, TierLabel::Earth);
        assert!(request.metadata_uri.starts_with("https://meta.test/metadata/"));
        assert_eq!(desk.pending_count().await, 1);

        let claimed = desk.claim(&request.request_id).await.unwrap();
        assert_eq!(claimed, request);
        assert!(matches!(
            desk.claim(&request.request_id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_expired_requests_are_pruned() {
        let (_dir, desk) = desk(chrono::Duration::zero()).await;
        desk.prepare(&snapshot()).await.unwrap();
        assert_eq!(desk.prune().await, 1);
        assert_eq!(desk.pending_count().await, 0);
    }

    #[tokio::test]
    async fn test_failed_snapshot_is_rejected() {
        let (_dir, desk) = desk(chrono::Duration::minutes(10)).await;
        let failed = WalletSnapshot::failed("Wallet", ErrorKind::RateLimited);
        assert!(desk.prepare(&failed).await.is_err());
    }
}
