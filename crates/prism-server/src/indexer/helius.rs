use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use prism_core::constants::{
    ASSET_PAGE_LIMIT, MAX_SIGNATURE_PAGES, SIGNATURE_PAGE_LIMIT, SPL_TOKEN_PROGRAM,
};
use prism_core::{AccountActivity, AssetRecord, ScanError, ScanResult, TokenAccountHolding, UpstreamError};

use super::endpoints::{Endpoint, EndpointPool};

// ============================================================================
// Helius Client - JSON-RPC with endpoint fallback
// ============================================================================

#[derive(Clone)]
pub struct HeliusClient {
    client: Client,
    endpoints: EndpointPool,
}

/// Signature history summary from the paginated signature query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureHistory {
    pub count: u64,
    pub oldest_block_time: Option<i64>,
    pub newest_block_time: Option<i64>,
}

/// Raw upstream reply for the RPC relay
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl HeliusClient {
    pub fn new(endpoints: EndpointPool, timeout: Duration) -> reqwest::Result<Self> {
        println!("[HELIUS] Initializing client with {} endpoint(s)", endpoints.len());
        tracing::debug!(endpoints = endpoints.len(), timeout_ms = timeout.as_millis() as u64, "Creating Helius client");

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &EndpointPool {
        &self.endpoints
    }

    /// Balance, signature history and token accounts from one endpoint,
    /// falling back to the next endpoint if any of the three fails.
    pub async fn fetch_account(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> ScanResult<(AccountActivity, Vec<TokenAccountHolding>)> {
        self.with_fallback(address, cancel, "account", |endpoint| async move {
            let (lamports, history, holdings) = tokio::try_join!(
                self.get_balance(&endpoint, address),
                self.get_signature_history(&endpoint, address),
                self.get_token_accounts(&endpoint, address),
            )?;

            let activity = AccountActivity {
                lamports,
                tx_count: history.count,
                oldest_block_time: history.oldest_block_time,
                newest_block_time: history.newest_block_time,
            };
            Ok((activity, holdings))
        })
        .await
    }

    /// Indexed (DAS) assets owned by the wallet, with endpoint fallback
    pub async fn fetch_assets(
        &self,
        address: &str,
        cancel: &CancellationToken,
    ) -> ScanResult<Vec<AssetRecord>> {
        self.with_fallback(address, cancel, "assets", |endpoint| async move {
            self.get_assets_by_owner(&endpoint, address).await
        })
        .await
    }

    /// Forward a raw JSON-RPC body to the endpoint `seed` maps to.
    /// Returns upstream status, content type and body untouched.
    pub async fn relay(&self, seed: &str, body: Vec<u8>) -> Result<RelayResponse, UpstreamError> {
        let endpoint = self
            .endpoints
            .ordered(seed)
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::Transport("no endpoint configured".to_string()))?;

        let body = if body.is_empty() { b"{}".to_vec() } else { body };
        let mut request = self
            .client
            .post(&endpoint.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        if endpoint.wallet_header {
            request = request.header("x-wallet-address", seed);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?
            .to_vec();

        Ok(RelayResponse {
            status,
            content_type,
            body,
        })
    }

    /// Try `op` against each endpoint once, in rotation order for `address`.
    async fn with_fallback<T, F, Fut>(
        &self,
        address: &str,
        cancel: &CancellationToken,
        chain: &'static str,
        op: F,
    ) -> ScanResult<T>
    where
        F: Fn(Endpoint) -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        if self.endpoints.is_empty() {
            return Err(ScanError::NoEndpointsConfigured);
        }

        let mut attempts = 0;
        let mut last = None;

        for endpoint in self.endpoints.ordered(address) {
            attempts += 1;
            let start = Instant::now();

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(wallet = %address, chain, "Scan cancelled");
                    return Err(ScanError::Cancelled);
                }
                result = op(endpoint) => result,
            };

            match result {
                Ok(value) => {
                    tracing::debug!(
                        wallet = %address,
                        chain,
                        attempt = attempts,
                        duration_ms = %start.elapsed().as_millis(),
                        "Ledger query succeeded"
                    );
                    return Ok(value);
                }
                Err(e) => {
                    println!("[HELIUS] {} query attempt {} failed: {}", chain, attempts, e);
                    tracing::warn!(
                        wallet = %address,
                        chain,
                        attempt = attempts,
                        error = %e,
                        "Ledger endpoint failed, trying next"
                    );
                    last = Some(e);
                }
            }
        }

        let last = last.unwrap_or(UpstreamError::Transport("no endpoint attempted".to_string()));
        tracing::error!(wallet = %address, chain, attempts, error = %last, "All ledger endpoints failed");
        Err(ScanError::AllEndpointsFailed { attempts, last })
    }

    async fn rpc(
        &self,
        endpoint: &Endpoint,
        address: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, UpstreamError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": "prism",
            "method": method,
            "params": params,
        });

        let mut request = self.client.post(&endpoint.url).json(&body);
        if endpoint.wallet_header {
            request = request.header("x-wallet-address", address);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(UpstreamError::RateLimited);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let mut payload: Value = response
            .json()
            .await
            .map_err(|e| UpstreamError::Malformed(format!("{method}: {e}")))?;

        if let Some(error) = payload.get("error").filter(|e| !e.is_null()) {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(UpstreamError::Malformed(format!("{method}: {message}")));
        }

        match payload.get_mut("result").map(Value::take) {
            Some(result) => Ok(result),
            None => Err(UpstreamError::Malformed(format!("{method}: missing result"))),
        }
    }

    async fn get_balance(&self, endpoint: &Endpoint, address: &str) -> Result<u64, UpstreamError> {
        let result = self.rpc(endpoint, address, "getBalance", json!([address])).await?;
        result
            .get("value")
            .and_then(Value::as_u64)
            .or_else(|| result.as_u64())
            .ok_or_else(|| UpstreamError::Malformed("getBalance: missing value".to_string()))
    }

    /// Walk signature pages newest to oldest until a short page or the page cap
    async fn get_signature_history(
        &self,
        endpoint: &Endpoint,
        address: &str,
    ) -> Result<SignatureHistory, UpstreamError> {
        let mut history = SignatureHistory::default();
        let mut before: Option<String> = None;

        for _ in 0..MAX_SIGNATURE_PAGES {
            let mut options = json!({ "limit": SIGNATURE_PAGE_LIMIT });
            if let Some(cursor) = &before {
                options["before"] = json!(cursor);
            }

            let result = self
                .rpc(endpoint, address, "getSignaturesForAddress", json!([address, options]))
                .await?;
            let page = result.as_array().ok_or_else(|| {
                UpstreamError::Malformed("getSignaturesForAddress: expected array".to_string())
            })?;

            history.count += page.len() as u64;
            for block_time in page
                .iter()
                .filter_map(|sig| sig.get("blockTime").and_then(Value::as_i64))
            {
                history.oldest_block_time =
                    Some(history.oldest_block_time.map_or(block_time, |t| t.min(block_time)));
                history.newest_block_time =
                    Some(history.newest_block_time.map_or(block_time, |t| t.max(block_time)));
            }

            if page.len() < SIGNATURE_PAGE_LIMIT {
                break;
            }

            match page
                .last()
                .and_then(|sig| sig.get("signature"))
                .and_then(Value::as_str)
            {
                Some(signature) => before = Some(signature.to_string()),
                None => break,
            }
        }

        tracing::debug!(wallet = %address, count = history.count, "Fetched signature history");
        Ok(history)
    }

    async fn get_token_accounts(
        &self,
        endpoint: &Endpoint,
        address: &str,
    ) -> Result<Vec<TokenAccountHolding>, UpstreamError> {
        let params = json!([
            address,
            { "programId": SPL_TOKEN_PROGRAM },
            { "encoding": "jsonParsed" }
        ]);
        let result = self
            .rpc(endpoint, address, "getTokenAccountsByOwner", params)
            .await?;

        let accounts = result
            .get("value")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(TokenAccountHolding::from_value).collect())
            .unwrap_or_default();
        Ok(accounts)
    }

    async fn get_assets_by_owner(
        &self,
        endpoint: &Endpoint,
        address: &str,
    ) -> Result<Vec<AssetRecord>, UpstreamError> {
        let params = json!({
            "ownerAddress": address,
            "page": 1,
            "limit": ASSET_PAGE_LIMIT,
            "displayOptions": { "showCollectionMetadata": true }
        });
        let result = self.rpc(endpoint, address, "getAssetsByOwner", params).await?;

        let assets: Vec<AssetRecord> = result
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(AssetRecord::from_value).collect())
            .unwrap_or_default();

        tracing::debug!(wallet = %address, count = assets.len(), "Fetched indexed assets");
        Ok(assets)
    }
}
