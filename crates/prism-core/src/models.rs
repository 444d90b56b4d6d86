//! Identity data models
//!
//! These are the structures the scoring pipeline produces and consumes: the
//! planet tier ladder, the flat trait record, the snapshot returned to
//! callers, and read-only views over the ledger provider's asset records.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorKind;

// =============================================================================
// Tier ladder
// =============================================================================

/// Planet tier, strictly ordered from `Mercury` (lowest) to `BinarySun`.
///
/// `BinarySun` is an override reserved for combo holders and is never
/// reachable from the score alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierLabel {
    Mercury,
    Mars,
    Venus,
    Earth,
    Neptune,
    Uranus,
    Saturn,
    Jupiter,
    Sun,
    BinarySun,
}

impl TierLabel {
    pub const ALL: [TierLabel; 10] = [
        TierLabel::Mercury,
        TierLabel::Mars,
        TierLabel::Venus,
        TierLabel::Earth,
        TierLabel::Neptune,
        TierLabel::Uranus,
        TierLabel::Saturn,
        TierLabel::Jupiter,
        TierLabel::Sun,
        TierLabel::BinarySun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierLabel::Mercury => "mercury",
            TierLabel::Mars => "mars",
            TierLabel::Venus => "venus",
            TierLabel::Earth => "earth",
            TierLabel::Neptune => "neptune",
            TierLabel::Uranus => "uranus",
            TierLabel::Saturn => "saturn",
            TierLabel::Jupiter => "jupiter",
            TierLabel::Sun => "sun",
            TierLabel::BinarySun => "binary_sun",
        }
    }
}

impl Default for TierLabel {
    fn default() -> Self {
        TierLabel::Mercury
    }
}

impl fmt::Display for TierLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse SOL holdings bucket shown next to the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolTier {
    Shrimp,
    Dolphin,
    Whale,
}

impl SolTier {
    pub fn from_balance(sol_balance: f64) -> Option<Self> {
        if sol_balance >= 10.0 {
            Some(SolTier::Whale)
        } else if sol_balance >= 1.0 {
            Some(SolTier::Dolphin)
        } else if sol_balance >= 0.1 {
            Some(SolTier::Shrimp)
        } else {
            None
        }
    }
}

// =============================================================================
// Traits and snapshot
// =============================================================================

/// Flat trait record derived strictly from on-chain data and constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletTraits {
    /// Balance in SOL (lamports / 1e9)
    pub sol_balance: f64,

    /// Days since the oldest fetched signature; 0 without transactions
    pub wallet_age_days: u64,

    /// Signatures returned, capped by pagination
    pub tx_count: u64,

    pub unique_token_count: u64,
    pub nft_count: u64,

    /// Lifetime average `tx_count / max(1, wallet_age_days)`.
    ///
    /// The name suggests a 30-day window; the value is not windowed.
    pub avg_tx_per_day_30d: f64,

    pub has_seeker: bool,
    pub has_preorder: bool,
    pub has_combo: bool,
    pub is_og: bool,
    pub is_whale: bool,
    pub is_collector: bool,
    pub is_early_adopter: bool,
    pub is_tx_titan: bool,
    pub is_solana_maxi: bool,
    pub is_blue_chip: bool,
    pub is_defi_king: bool,
    pub is_meme_lord: bool,
    pub hyperactive_degen: bool,
    pub diamond_hands: bool,

    pub planet_tier: TierLabel,

    /// Meme symbols with a positive balance, sorted
    pub meme_coins_held: Vec<String>,
    /// Static-price notional value of meme holdings
    pub meme_value_usd: f64,
    /// Days since the newest fetched signature
    pub days_since_last_tx: Option<u64>,
    /// Number of records returned by the indexed asset query
    pub total_assets_count: u64,
    pub sol_tier: Option<SolTier>,
}

/// Root output of a scan. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub address: String,
    pub score: u32,
    pub tier: TierLabel,
    pub traits: WalletTraits,
    pub error: Option<ErrorKind>,
}

impl WalletSnapshot {
    /// Snapshot for a scan that could not complete. Nothing in it is scored.
    pub fn failed(address: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            address: address.into(),
            score: 0,
            tier: TierLabel::Mercury,
            traits: WalletTraits::default(),
            error: Some(kind),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.error.is_none()
    }
}

// =============================================================================
// Account activity
// =============================================================================

/// Account-level figures from the balance and signature queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountActivity {
    pub lamports: u64,
    pub tx_count: u64,
    /// Unix seconds of the oldest fetched signature that carries a block time
    pub oldest_block_time: Option<i64>,
    /// Unix seconds of the newest fetched signature that carries a block time
    pub newest_block_time: Option<i64>,
}

// =============================================================================
// Asset records (indexed "assets by owner" query)
// =============================================================================

/// A grouping entry (`group_key`, `group_value`), e.g. collection membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetGroup {
    pub key: String,
    pub value: String,
}

/// Fungible token details attached to an asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub decimals: Option<u8>,
    pub supply: Option<f64>,
    /// Raw balance in base units
    pub balance: Option<f64>,
    /// A field was present but could not be read
    pub malformed: bool,
}

/// Read-only view of one record from the indexed asset query.
///
/// Every nested field the provider may omit is an `Option`; all navigation
/// over the raw JSON happens in [`AssetRecord::from_value`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub image: Option<String>,
    pub groups: Vec<AssetGroup>,
    pub authorities: Vec<String>,
    pub creators: Vec<String>,
    pub interface: Option<String>,
    pub token_info: Option<TokenInfo>,
    pub compressed: bool,
}

impl AssetRecord {
    /// Decode a raw DAS asset. Missing or mistyped fields become `None`/empty.
    pub fn from_value(value: &Value) -> Self {
        let content = value.get("content");
        let metadata = content.and_then(|c| c.get("metadata"));

        let groups = value
            .get("grouping")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|g| {
                        Some(AssetGroup {
                            key: g.get("group_key")?.as_str()?.to_string(),
                            value: g.get("group_value")?.as_str()?.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: str_field(value, "id").unwrap_or_default(),
            name: metadata.and_then(|m| str_field(m, "name")),
            symbol: metadata.and_then(|m| str_field(m, "symbol")),
            image: content
                .and_then(|c| c.get("links"))
                .and_then(|l| str_field(l, "image")),
            groups,
            authorities: addresses(value.get("authorities")),
            creators: addresses(value.get("creators")),
            interface: str_field(value, "interface"),
            token_info: value
                .get("token_info")
                .filter(|v| !v.is_null())
                .map(TokenInfo::from_value),
            compressed: value
                .get("compression")
                .and_then(|c| c.get("compressed"))
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    /// Value of the `collection` grouping, if any
    pub fn collection(&self) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.key == "collection")
            .map(|g| g.value.as_str())
    }
}

impl TokenInfo {
    fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self {
                malformed: true,
                ..Self::default()
            };
        }

        let mut info = Self::default();

        match value.get("decimals") {
            None | Some(Value::Null) => {}
            Some(raw) => match raw.as_u64().and_then(|d| u8::try_from(d).ok()) {
                Some(d) => info.decimals = Some(d),
                None => info.malformed = true,
            },
        }

        match value.get("supply") {
            None | Some(Value::Null) => {}
            Some(raw) => match number(raw) {
                Some(s) => info.supply = Some(s),
                None => info.malformed = true,
            },
        }

        let balance = value
            .get("balance")
            .filter(|v| !v.is_null())
            .or_else(|| value.get("amount").filter(|v| !v.is_null()));
        if let Some(raw) = balance {
            match number(raw) {
                Some(b) => info.balance = Some(b),
                None => info.malformed = true,
            }
        }

        info
    }
}

// =============================================================================
// Token accounts (fallback scan)
// =============================================================================

/// One parsed SPL token account from `getTokenAccountsByOwner`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAccountHolding {
    pub mint: String,
    pub ui_amount: f64,
    pub decimals: u8,
}

impl TokenAccountHolding {
    /// Decode one `value[]` entry of a jsonParsed token-account response.
    /// Returns `None` when the entry carries no mint.
    pub fn from_value(value: &Value) -> Option<Self> {
        let info = value
            .get("account")?
            .get("data")?
            .get("parsed")?
            .get("info")?;
        let mint = info.get("mint")?.as_str()?.to_string();
        let amount = info.get("tokenAmount");

        let decimals = amount
            .and_then(|a| a.get("decimals"))
            .and_then(Value::as_u64)
            .and_then(|d| u8::try_from(d).ok())
            .unwrap_or(0);
        let ui_amount = amount
            .and_then(|a| a.get("uiAmount"))
            .and_then(Value::as_f64)
            .or_else(|| {
                amount
                    .and_then(|a| a.get("uiAmountString"))
                    .and_then(number)
            })
            .unwrap_or(0.0);

        Some(Self {
            mint,
            ui_amount,
            decimals,
        })
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn addresses(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| str_field(item, "address"))
                .collect()
        })
        .unwrap_or_default()
}

/// Numbers arrive either as JSON numbers or as decimal strings
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tier_ordering() {
        assert!(TierLabel::Mercury < TierLabel::Mars);
        assert!(TierLabel::Sun < TierLabel::BinarySun);
        assert_eq!(TierLabel::ALL.len(), 10);
        assert_eq!(
            serde_json::to_string(&TierLabel::BinarySun).unwrap(),
            "\"binary_sun\""
        );
    }

    #[test]
    fn test_decode_full_asset() {
        let raw = json!({
            "id": "Mint111",
            "interface": "V1_NFT",
            "content": {
                "metadata": { "name": "Mad Lad #1", "symbol": "MAD" },
                "links": { "image": "https://img" }
            },
            "grouping": [{ "group_key": "collection", "group_value": "Col111" }],
            "authorities": [{ "address": "Auth111", "scopes": ["full"] }],
            "creators": [{ "address": "Creator111", "share": 100, "verified": true }],
            "compression": { "compressed": true },
            "token_info": { "decimals": 0, "supply": 1, "balance": "1" }
        });

        let asset = AssetRecord::from_value(&raw);
        assert_eq!(asset.id, "Mint111");
        assert_eq!(asset.name.as_deref(), Some("Mad Lad #1"));
        assert_eq!(asset.image.as_deref(), Some("https://img"));
        assert_eq!(asset.collection(), Some("Col111"));
        assert_eq!(asset.authorities, vec!["Auth111".to_string()]);
        assert_eq!(asset.creators, vec!["Creator111".to_string()]);
        assert!(asset.compressed);
        let info = asset.token_info.unwrap();
        assert_eq!(info.decimals, Some(0));
        assert_eq!(info.balance, Some(1.0));
        assert!(!info.malformed);
    }

    #[test]
    fn test_decode_sparse_asset() {
        let asset = AssetRecord::from_value(&json!({ "id": "Bare" }));
        assert_eq!(asset.id, "Bare");
        assert!(asset.name.is_none());
        assert!(asset.groups.is_empty());
        assert!(asset.token_info.is_none());
        assert!(!asset.compressed);

        let nothing = AssetRecord::from_value(&json!("not an object"));
        assert_eq!(nothing.id, "");
    }

    #[test]
    fn test_decode_malformed_token_info() {
        let asset = AssetRecord::from_value(&json!({
            "id": "Bad",
            "token_info": { "decimals": "nine", "balance": "lots" }
        }));
        let info = asset.token_info.unwrap();
        assert!(info.malformed);
        assert_eq!(info.decimals, None);
    }

    #[test]
    fn test_null_token_info_is_absent() {
        let asset = AssetRecord::from_value(&json!({ "id": "Core", "token_info": null }));
        assert!(asset.token_info.is_none());
    }

    #[test]
    fn test_decode_token_account() {
        let raw = json!({
            "pubkey": "Acct",
            "account": { "data": { "parsed": { "info": {
                "mint": "MintX",
                "tokenAmount": { "uiAmount": 2.5, "decimals": 6, "amount": "2500000" }
            }}}}
        });
        let holding = TokenAccountHolding::from_value(&raw).unwrap();
        assert_eq!(holding.mint, "MintX");
        assert_eq!(holding.ui_amount, 2.5);
        assert_eq!(holding.decimals, 6);

        assert!(TokenAccountHolding::from_value(&json!({ "account": {} })).is_none());
    }

    #[test]
    fn test_sol_tier() {
        assert_eq!(SolTier::from_balance(0.05), None);
        assert_eq!(SolTier::from_balance(0.1), Some(SolTier::Shrimp));
        assert_eq!(SolTier::from_balance(3.0), Some(SolTier::Dolphin));
        assert_eq!(SolTier::from_balance(12.0), Some(SolTier::Whale));
    }
}
