pub mod endpoints;
pub mod helius;

use std::time::{Duration, Instant};

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use prism_core::{build_snapshot, validate_address, ScanResult, WalletSnapshot};

use self::endpoints::EndpointPool;
use self::helius::HeliusClient;
use crate::config::HeliusConfig;

/// Builds identity snapshots from live ledger data
#[derive(Clone)]
pub struct Indexer {
    helius: HeliusClient,
}

impl Indexer {
    pub fn new(config: &HeliusConfig) -> reqwest::Result<Self> {
        let pool = EndpointPool::from_config(config);
        let timeout = Duration::from_secs(config.timeout_seconds.max(1));
        Ok(Self::with_client(HeliusClient::new(pool, timeout)?))
    }

    pub fn with_client(helius: HeliusClient) -> Self {
        Self { helius }
    }

    pub fn helius(&self) -> &HeliusClient {
        &self.helius
    }

    /// Fetch, classify and score one wallet.
    ///
    /// The account chain and the asset chain run concurrently; if either
    /// fails the whole scan fails and nothing is scored.
    pub async fn scan(&self, address: &str, cancel: &CancellationToken) -> ScanResult<WalletSnapshot> {
        validate_address(address)?;
        let start = Instant::now();

        println!("[INDEXER] Scanning wallet {}", address);
        tracing::info!(wallet = %address, "Starting identity scan");

        let ((activity, holdings), assets) = tokio::try_join!(
            self.helius.fetch_account(address, cancel),
            self.helius.fetch_assets(address, cancel),
        )?;

        let snapshot = build_snapshot(address, &activity, &assets, &holdings, Utc::now());

        println!(
            "[INDEXER] Scan complete for {}: score={} tier={} ({}ms)",
            address,
            snapshot.score,
            snapshot.tier,
            start.elapsed().as_millis()
        );
        tracing::info!(
            wallet = %address,
            score = snapshot.score,
            tier = %snapshot.tier,
            tx_count = snapshot.traits.tx_count,
            assets = snapshot.traits.total_assets_count,
            duration_ms = %start.elapsed().as_millis(),
            "Identity scan completed"
        );

        Ok(snapshot)
    }
}
