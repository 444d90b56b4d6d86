//! Asset classification
//!
//! Decides whether each asset record is a fungible token or an NFT and
//! detects the marker facts (Seeker genesis, Chapter 2 preorder, blue-chip
//! collection, DeFi hint, liquid staking, meme holding) the trait
//! aggregator folds into wallet traits. Nothing here fails: an asset the
//! classifier cannot read falls back to fungible with no value attached.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::models::{AssetRecord, TokenAccountHolding};

/// Partition an asset falls into. Every classified asset is exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Fungible,
    NonFungible,
}

/// Meme token balance valued at the static price table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemeHolding {
    pub symbol: String,
    pub amount: f64,
    pub value_usd: f64,
}

/// Marker facts detected on a single asset. Not mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetMarkers {
    pub seeker: bool,
    pub preorder: bool,
    pub blue_chip: bool,
    pub defi: bool,
    pub liquid_staking: bool,
    pub meme: Option<MemeHolding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedAsset {
    pub mint: String,
    pub class: AssetClass,
    pub markers: AssetMarkers,
}

/// Classify one record from the indexed asset query
pub fn classify_asset(asset: &AssetRecord) -> ClassifiedAsset {
    let class = asset_class(asset);

    let mut markers = AssetMarkers {
        seeker: is_seeker(asset),
        preorder: is_preorder(asset),
        defi: has_defi_hint(asset),
        liquid_staking: is_lst_mint(&asset.id),
        ..AssetMarkers::default()
    };

    if class == AssetClass::NonFungible {
        markers.blue_chip = asset.collection().is_some_and(is_blue_chip_collection);
    }

    if let Some((symbol, price)) = meme_coin(&asset.id) {
        if let Some(amount) = ui_amount(asset).filter(|a| *a > 0.0) {
            markers.meme = Some(MemeHolding {
                symbol: symbol.to_string(),
                amount,
                value_usd: amount * price,
            });
        }
    }

    ClassifiedAsset {
        mint: asset.id.clone(),
        class,
        markers,
    }
}

/// Classify a plain SPL token account from the fallback scan.
///
/// Only mint-based markers can be checked here; there is no metadata.
pub fn classify_holding(holding: &TokenAccountHolding) -> ClassifiedAsset {
    let class = if holding.decimals == 0 {
        AssetClass::NonFungible
    } else {
        AssetClass::Fungible
    };

    let meme = meme_coin(&holding.mint)
        .filter(|_| holding.ui_amount > 0.0)
        .map(|(symbol, price)| MemeHolding {
            symbol: symbol.to_string(),
            amount: holding.ui_amount,
            value_usd: holding.ui_amount * price,
        });

    ClassifiedAsset {
        mint: holding.mint.clone(),
        class,
        markers: AssetMarkers {
            preorder: holding.mint == CHAPTER2_PREORDER_MINT,
            liquid_staking: is_lst_mint(&holding.mint),
            meme,
            ..AssetMarkers::default()
        },
    }
}

/// NFT vs fungible, first matching rule wins
fn asset_class(asset: &AssetRecord) -> AssetClass {
    let iface = interface(asset);

    if iface.contains("NFT") || iface.contains("PROGRAMMABLE") || iface == "CUSTOM" || asset.compressed
    {
        return AssetClass::NonFungible;
    }

    let Some(decimals) = decimals(asset) else {
        return AssetClass::Fungible;
    };

    let has_identity = asset.name.as_deref().is_some_and(|n| !n.is_empty())
        || asset.image.as_deref().is_some_and(|i| !i.is_empty())
        || !asset.groups.is_empty();

    if decimals == 0 && has_identity && !is_known_fungible(asset, decimals) {
        return AssetClass::NonFungible;
    }

    AssetClass::Fungible
}

fn interface(asset: &AssetRecord) -> String {
    asset.interface.as_deref().unwrap_or_default().to_uppercase()
}

fn is_fungible_interface(iface: &str) -> bool {
    iface == "FUNGIBLETOKEN" || iface == "FUNGIBLEASSET"
}

fn supply(asset: &AssetRecord) -> f64 {
    asset
        .token_info
        .as_ref()
        .and_then(|t| t.supply)
        .unwrap_or(0.0)
}

fn is_known_fungible(asset: &AssetRecord, decimals: u8) -> bool {
    is_fungible_interface(&interface(asset)) || (supply(asset) > 1.0 && decimals > 0)
}

/// Effective decimals. `None` when token_info is present but unreadable.
///
/// Without token_info decimals, fungible-looking assets are assumed to use 9.
fn decimals(asset: &AssetRecord) -> Option<u8> {
    let inferred = || {
        if is_fungible_interface(&interface(asset)) || supply(asset) > 1.0 {
            9
        } else {
            0
        }
    };

    match &asset.token_info {
        Some(info) if info.malformed => None,
        Some(info) => Some(info.decimals.unwrap_or_else(inferred)),
        None => Some(inferred()),
    }
}

/// Human-readable balance; raw balance when decimals are 0
fn ui_amount(asset: &AssetRecord) -> Option<f64> {
    let decimals = decimals(asset)?;
    let raw = asset.token_info.as_ref()?.balance?;
    if decimals > 0 {
        Some(raw / 10f64.powi(decimals as i32))
    } else {
        Some(raw)
    }
}

/// Lower-cased display name, falling back to the mint id
fn display_name(asset: &AssetRecord) -> String {
    asset
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(&asset.id)
        .to_lowercase()
}

fn is_seeker(asset: &AssetRecord) -> bool {
    let name = display_name(asset);
    let symbol = asset.symbol.as_deref().unwrap_or_default().to_lowercase();

    let named = (name.contains("seeker") || symbol.contains("seeker"))
        && !name.contains("preorder")
        && !name.contains("chapter 2");

    let genesis_collection = asset.collection() == Some(SEEKER_GENESIS_COLLECTION);

    let minted_by_authority = asset
        .authorities
        .iter()
        .chain(asset.creators.iter())
        .any(|address| address == SEEKER_MINT_AUTHORITY);

    let genesis_named =
        name.contains("seeker") && (name.contains("genesis") || name.contains("citizen"));

    named || genesis_collection || minted_by_authority || genesis_named
}

fn is_preorder(asset: &AssetRecord) -> bool {
    let raw_name = asset
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(&asset.id);

    asset.id == CHAPTER2_PREORDER_MINT
        || raw_name.contains("Chapter 2")
        || raw_name.contains("Seeker Preorder")
        || asset
            .groups
            .iter()
            .any(|g| g.value == CHAPTER2_PREORDER_COLLECTION)
}

fn has_defi_hint(asset: &AssetRecord) -> bool {
    let name = display_name(asset);
    DEFI_POSITION_HINTS.iter().any(|hint| name.contains(hint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetGroup, TokenInfo};

    fn asset(id: &str) -> AssetRecord {
        AssetRecord {
            id: id.to_string(),
            ..AssetRecord::default()
        }
    }

    fn token_info(decimals: Option<u8>, supply: Option<f64>, balance: Option<f64>) -> Option<TokenInfo> {
        Some(TokenInfo {
            decimals,
            supply,
            balance,
            malformed: false,
        })
    }

    #[test]
    fn test_explicit_interface_is_nft() {
        for iface in ["V1_NFT", "ProgrammableNFT", "Custom", "MplCoreAsset_NFT"] {
            let mut a = asset("A");
            a.interface = Some(iface.to_string());
            assert_eq!(classify_asset(&a).class, AssetClass::NonFungible, "{iface}");
        }

        let mut compressed = asset("C");
        compressed.interface = Some("FungibleToken".to_string());
        compressed.compressed = true;
        assert_eq!(classify_asset(&compressed).class, AssetClass::NonFungible);
    }

    #[test]
    fn test_zero_decimals_with_identity_is_nft() {
        let mut a = asset("A");
        a.name = Some("Some Art".to_string());
        a.token_info = token_info(Some(0), Some(1.0), Some(1.0));
        assert_eq!(classify_asset(&a).class, AssetClass::NonFungible);

        let mut grouped = asset("B");
        grouped.groups.push(AssetGroup {
            key: "collection".into(),
            value: "Col".into(),
        });
        assert_eq!(classify_asset(&grouped).class, AssetClass::NonFungible);

        // No name, image or grouping: nothing marks it as a collectible
        assert_eq!(classify_asset(&asset("C")).class, AssetClass::Fungible);
    }

    #[test]
    fn test_fungible_rules() {
        let mut iface = asset("A");
        iface.name = Some("USD Coin".to_string());
        iface.interface = Some("FungibleToken".to_string());
        iface.token_info = token_info(Some(0), None, None);
        assert_eq!(classify_asset(&iface).class, AssetClass::Fungible);

        let mut supply = asset("B");
        supply.name = Some("Token".to_string());
        supply.token_info = token_info(Some(6), Some(1_000_000.0), Some(5.0));
        assert_eq!(classify_asset(&supply).class, AssetClass::Fungible);

        // Missing decimals with a large supply infers 9 and stays fungible
        let mut inferred = asset("C");
        inferred.name = Some("Token".to_string());
        inferred.token_info = token_info(None, Some(500.0), None);
        assert_eq!(classify_asset(&inferred).class, AssetClass::Fungible);
    }

    #[test]
    fn test_malformed_token_info_falls_back_to_fungible() {
        let mut a = asset("A");
        a.name = Some("Looks Like Art".to_string());
        a.token_info = Some(TokenInfo {
            malformed: true,
            ..TokenInfo::default()
        });
        let classified = classify_asset(&a);
        assert_eq!(classified.class, AssetClass::Fungible);
        assert!(classified.markers.meme.is_none());
    }

    #[test]
    fn test_null_token_info_core_asset_is_blue_chip_nft() {
        let raw = serde_json::json!({
            "id": "CoreArt1",
            "interface": "MplCoreAsset",
            "content": {
                "metadata": { "name": "Core Art #1" },
                "links": { "image": "https://img.test/1.png" }
            },
            "grouping": [{ "group_key": "collection", "group_value": BLUE_CHIP_COLLECTIONS[0] }],
            "token_info": null
        });
        let classified = classify_asset(&AssetRecord::from_value(&raw));
        assert_eq!(classified.class, AssetClass::NonFungible);
        assert!(classified.markers.blue_chip);
    }

    #[test]
    fn test_seeker_markers() {
        let mut named = asset("A");
        named.name = Some("Seeker Genesis Token".to_string());
        assert!(classify_asset(&named).markers.seeker);

        let mut by_symbol = asset("B");
        by_symbol.name = Some("Phone pass".to_string());
        by_symbol.symbol = Some("SEEKER".to_string());
        assert!(classify_asset(&by_symbol).markers.seeker);

        let mut preorder_named = asset("C");
        preorder_named.name = Some("Seeker Preorder".to_string());
        let m = classify_asset(&preorder_named).markers;
        assert!(!m.seeker);
        assert!(m.preorder);

        let mut by_collection = asset("D");
        by_collection.groups.push(AssetGroup {
            key: "collection".into(),
            value: SEEKER_GENESIS_COLLECTION.into(),
        });
        assert!(classify_asset(&by_collection).markers.seeker);

        let mut by_creator = asset("E");
        by_creator.creators.push(SEEKER_MINT_AUTHORITY.to_string());
        assert!(classify_asset(&by_creator).markers.seeker);
    }

    #[test]
    fn test_preorder_markers() {
        assert!(classify_asset(&asset(CHAPTER2_PREORDER_MINT)).markers.preorder);

        let mut chapter = asset("A");
        chapter.name = Some("Chapter 2 Pass".to_string());
        assert!(classify_asset(&chapter).markers.preorder);

        let mut grouped = asset("B");
        grouped.groups.push(AssetGroup {
            key: "any".into(),
            value: CHAPTER2_PREORDER_COLLECTION.into(),
        });
        assert!(classify_asset(&grouped).markers.preorder);

        let holding = TokenAccountHolding {
            mint: CHAPTER2_PREORDER_MINT.to_string(),
            ui_amount: 1.0,
            decimals: 0,
        };
        let classified = classify_holding(&holding);
        assert!(classified.markers.preorder);
        assert_eq!(classified.class, AssetClass::NonFungible);
    }

    #[test]
    fn test_blue_chip_requires_nft() {
        let mut nft = asset("A");
        nft.interface = Some("V1_NFT".to_string());
        nft.groups.push(AssetGroup {
            key: "collection".into(),
            value: BLUE_CHIP_COLLECTIONS[0].into(),
        });
        assert!(classify_asset(&nft).markers.blue_chip);

        let mut fungible = nft.clone();
        fungible.interface = Some("FungibleToken".to_string());
        fungible.token_info = token_info(Some(6), Some(10.0), None);
        assert!(!classify_asset(&fungible).markers.blue_chip);
    }

    #[test]
    fn test_defi_and_lst_markers() {
        let mut defi = asset("A");
        defi.name = Some("Kamino Lend Position".to_string());
        assert!(classify_asset(&defi).markers.defi);

        let lst = classify_asset(&asset(LST_MINTS[1]));
        assert!(lst.markers.liquid_staking);
        assert!(!lst.markers.defi);
    }

    #[test]
    fn test_meme_valuation() {
        // 4 WIF with 6 decimals
        let mut wif = asset(MEME_COINS[1].1);
        wif.interface = Some("FungibleToken".to_string());
        wif.token_info = token_info(Some(6), Some(1e15), Some(4_000_000.0));
        let meme = classify_asset(&wif).markers.meme.unwrap();
        assert_eq!(meme.symbol, "WIF");
        assert!((meme.amount - 4.0).abs() < 1e-9);
        assert!((meme.value_usd - 14.0).abs() < 1e-9);

        let mut empty = wif.clone();
        empty.token_info = token_info(Some(6), Some(1e15), Some(0.0));
        assert!(classify_asset(&empty).markers.meme.is_none());
    }
}
