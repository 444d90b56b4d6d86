//! Mint preparation
//!
//! Builds the on-chain metadata document for an identity card and the
//! request record an external minter claims. No transactions happen here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{TierLabel, WalletSnapshot, WalletTraits};

const DESCRIPTION: &str =
    "Identity Prism: a living Solana identity card built from your on-chain footprint.";

/// Collection branding applied to every minted card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintBranding {
    pub collection: String,
    pub symbol: String,
    pub network: String,
    pub image_url: String,
    pub app_base_url: Option<String>,
}

/// Trait flags carried into the mint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintTraits {
    pub seeker: bool,
    pub preorder: bool,
    pub combo: bool,
    pub blue_chip: bool,
    pub meme_lord: bool,
    pub defi_king: bool,
    pub hyperactive: bool,
    pub diamond_hands: bool,
}

impl From<&WalletTraits> for MintTraits {
    fn from(traits: &WalletTraits) -> Self {
        Self {
            seeker: traits.has_seeker,
            preorder: traits.has_preorder,
            combo: traits.has_combo,
            blue_chip: traits.is_blue_chip,
            meme_lord: traits.is_meme_lord,
            defi_king: traits.is_defi_king,
            hyperactive: traits.hyperactive_degen,
            diamond_hands: traits.diamond_hands,
        }
    }
}

/// A prepared mint waiting to be claimed by the minter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MintRequest {
    pub request_id: String,
    pub address: String,
    pub score: u32,
    pub tier: TierLabel,
    pub traits: MintTraits,
    pub network: String,
    pub metadata_uri: String,
    pub created_at: DateTime<Utc>,
}

impl MintRequest {
    pub fn new(
        request_id: impl Into<String>,
        snapshot: &WalletSnapshot,
        branding: &MintBranding,
        metadata_uri: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            address: snapshot.address.clone(),
            score: snapshot.score,
            tier: snapshot.tier,
            traits: MintTraits::from(&snapshot.traits),
            network: branding.network.clone(),
            metadata_uri: metadata_uri.into(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataFile {
    pub uri: String,
    #[serde(rename = "type")]
    pub mime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataProperties {
    pub files: Vec<MetadataFile>,
    pub category: String,
}

/// Token metadata JSON in the common NFT standard layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_url: Option<String>,
    pub attributes: Vec<Attribute>,
    pub properties: MetadataProperties,
}

/// `ABCD...WXYZ` form of an address; short inputs are returned whole
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

pub fn metadata_document(snapshot: &WalletSnapshot, branding: &MintBranding) -> MetadataDocument {
    let traits = &snapshot.traits;
    let card_url = branding
        .app_base_url
        .as_deref()
        .map(|base| format!("{}/?address={}", base.trim_end_matches('/'), snapshot.address));

    let attribute = |name: &str, value: Value| Attribute {
        trait_type: name.to_string(),
        value,
    };

    MetadataDocument {
        name: format!("{} #{}", branding.collection, short_address(&snapshot.address)),
        symbol: branding.symbol.clone(),
        description: DESCRIPTION.to_string(),
        image: branding.image_url.clone(),
        external_url: card_url.clone(),
        animation_url: card_url,
        attributes: vec![
            attribute("Tier", Value::from(snapshot.tier.as_str())),
            attribute("Score", Value::from(snapshot.score)),
            attribute("NFTs", Value::from(traits.nft_count)),
            attribute("Tokens", Value::from(traits.unique_token_count)),
            attribute("Transactions", Value::from(traits.tx_count)),
            attribute("Wallet Age (days)", Value::from(traits.wallet_age_days)),
        ],
        properties: MetadataProperties {
            files: vec![MetadataFile {
                uri: branding.image_url.clone(),
                mime: "image/png".to_string(),
            }],
            category: "image".to_string(),
        },
    }
}
