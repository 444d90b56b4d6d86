use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use prism_core::MintBranding;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub helius: HeliusConfig,
    pub storage: StorageConfig,
    pub mint: MintConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long a finished session stays readable
    pub session_ttl_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HeliusConfig {
    /// Comma separated list of API keys
    pub api_keys: String,
    pub rpc_base: String,
    /// When set, every ledger call goes through `{proxy_url}/rpc`
    #[serde(default)]
    pub proxy_url: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub metadata_dir: String,
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MintConfig {
    pub collection: String,
    pub symbol: String,
    pub network: String,
    pub image_url: String,
    #[serde(default)]
    pub app_base_url: Option<String>,
    pub pending_ttl_seconds: u64,
    pub prune_interval_seconds: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8787)?
            .set_default("server.session_ttl_seconds", 1800)?
            .set_default("helius.api_keys", "")?
            .set_default("helius.rpc_base", "https://mainnet.helius-rpc.com/")?
            .set_default("helius.timeout_seconds", 20)?
            .set_default("storage.metadata_dir", "metadata")?
            .set_default("storage.public_base_url", "http://localhost:8787")?
            .set_default("mint.collection", "Identity Prism")?
            .set_default("mint.symbol", "PRISM")?
            .set_default("mint.network", "mainnet-beta")?
            .set_default("mint.image_url", "")?
            .set_default("mint.pending_ttl_seconds", 600)?
            .set_default("mint.prune_interval_seconds", 60)?
            // Load from config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (PRISM__HELIUS__API_KEYS, etc.)
            .add_source(
                Environment::with_prefix("PRISM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl HeliusConfig {
    pub fn keys(&self) -> Vec<String> {
        self.api_keys
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy_url
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Upper bound for how long prepared mints and finished sessions are kept
const MAX_RETENTION_SECONDS: u64 = 7 * 24 * 60 * 60;

fn retention(seconds: u64) -> chrono::Duration {
    chrono::Duration::seconds(seconds.min(MAX_RETENTION_SECONDS) as i64)
}

impl ServerConfig {
    pub fn session_ttl(&self) -> chrono::Duration {
        retention(self.session_ttl_seconds)
    }
}

impl MintConfig {
    pub fn pending_ttl(&self) -> chrono::Duration {
        retention(self.pending_ttl_seconds)
    }

    pub fn branding(&self) -> MintBranding {
        MintBranding {
            collection: self.collection.clone(),
            symbol: self.symbol.clone(),
            network: self.network.clone(),
            image_url: self.image_url.clone(),
            app_base_url: self
                .app_base_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helius(api_keys: &str, proxy_url: Option<&str>) -> HeliusConfig {
        HeliusConfig {
            api_keys: api_keys.to_string(),
            rpc_base: "https://rpc.test/".to_string(),
            proxy_url: proxy_url.map(str::to_string),
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_keys_are_trimmed_and_filtered() {
        assert_eq!(helius(" a, b ,,c ", None).keys(), vec!["a", "b", "c"]);
        assert!(helius("", None).keys().is_empty());
    }

    #[test]
    fn test_pending_ttl_is_capped() {
        let mut mint = MintConfig {
            collection: "Identity Prism".to_string(),
            symbol: "PRISM".to_string(),
            network: "devnet".to_string(),
            image_url: String::new(),
            app_base_url: Some(" ".to_string()),
            pending_ttl_seconds: 600,
            prune_interval_seconds: 60,
        };
        assert_eq!(mint.pending_ttl().num_seconds(), 600);
        assert_eq!(mint.branding().app_base_url, None);

        mint.pending_ttl_seconds = u64::MAX;
        assert_eq!(mint.pending_ttl().num_seconds(), MAX_RETENTION_SECONDS as i64);
    }

    #[test]
    fn test_session_ttl_is_capped() {
        let mut server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8787,
            session_ttl_seconds: 1800,
        };
        assert_eq!(server.session_ttl().num_minutes(), 30);
        server.session_ttl_seconds = u64::MAX;
        assert_eq!(server.session_ttl().num_seconds(), MAX_RETENTION_SECONDS as i64);
    }

    #[test]
    fn test_blank_proxy_is_ignored() {
        assert_eq!(helius("", Some("  ")).proxy(), None);
        assert_eq!(
            helius("", Some("https://proxy.test")).proxy(),
            Some("https://proxy.test")
        );
    }
}
