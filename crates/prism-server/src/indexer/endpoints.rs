//! Ledger endpoint pool
//!
//! Every request walks the configured endpoints once, starting at an index
//! derived from the wallet address so load spreads across API keys while a
//! given wallet keeps hitting the same key first.

use crate::config::HeliusConfig;

const SEED_MODULUS: u64 = 2_147_483_647;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    /// Send `x-wallet-address` so the proxy can pick its own key
    pub wallet_header: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EndpointPool {
    endpoints: Vec<Endpoint>,
}

impl EndpointPool {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    /// Proxy routing wins over direct keys when both are configured
    pub fn from_config(config: &HeliusConfig) -> Self {
        if let Some(proxy) = config.proxy() {
            return Self::new(vec![Endpoint {
                url: format!("{}/rpc", proxy.trim_end_matches('/')),
                wallet_header: true,
            }]);
        }

        Self::new(
            config
                .keys()
                .into_iter()
                .map(|key| Endpoint {
                    url: keyed_url(&config.rpc_base, &key),
                    wallet_header: false,
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Index of the first endpoint to try for `seed`
    pub fn start_index(&self, seed: &str) -> usize {
        if self.endpoints.is_empty() {
            return 0;
        }
        (seed_hash(seed) % self.endpoints.len() as u64) as usize
    }

    /// All endpoints in attempt order for `seed`, each exactly once
    pub fn ordered(&self, seed: &str) -> Vec<Endpoint> {
        let start = self.start_index(seed);
        self.endpoints[start..]
            .iter()
            .chain(self.endpoints[..start].iter())
            .cloned()
            .collect()
    }
}

/// `h = (h * 31 + unit) mod 2^31-1` over the UTF-16 code units of `seed`
pub fn seed_hash(seed: &str) -> u64 {
    seed.encode_utf16()
        .fold(0u64, |h, unit| (h * 31 + unit as u64) % SEED_MODULUS)
}

fn keyed_url(rpc_base: &str, key: &str) -> String {
    let separator = if rpc_base.contains('?') { '&' } else { '?' };
    format!("{rpc_base}{separator}api-key={key}")
}
