//! Trait aggregation
//!
//! Folds account activity and classified holdings into a [`WalletTraits`]
//! record, then scores it into a finished [`WalletSnapshot`].

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};

use crate::classifier::{classify_asset, classify_holding, AssetClass, ClassifiedAsset};
use crate::constants::*;
use crate::models::*;
use crate::scoring;

const SECONDS_PER_DAY: i64 = 86_400;

/// Running totals while walking classified assets
#[derive(Debug, Default)]
struct Tally {
    counted: HashSet<String>,
    valued: HashSet<String>,
    tokens: u64,
    nfts: u64,
    seeker: bool,
    preorder: bool,
    blue_chip: bool,
    defi: bool,
    liquid_staking: bool,
    meme_symbols: BTreeSet<String>,
    meme_value_usd: f64,
}

impl Tally {
    /// Record an asset. Returns false when the mint was already counted.
    fn count(&mut self, asset: &ClassifiedAsset) -> bool {
        if !self.counted.insert(asset.mint.clone()) {
            return false;
        }
        match asset.class {
            AssetClass::NonFungible => self.nfts += 1,
            AssetClass::Fungible => self.tokens += 1,
        }
        true
    }

    fn mark(&mut self, asset: &ClassifiedAsset) {
        let markers = &asset.markers;
        self.seeker |= markers.seeker;
        self.preorder |= markers.preorder;
        self.blue_chip |= markers.blue_chip;
        self.defi |= markers.defi;
        self.liquid_staking |= markers.liquid_staking;

        if let Some(meme) = &markers.meme {
            if self.valued.insert(asset.mint.clone()) {
                self.meme_value_usd += meme.value_usd;
                self.meme_symbols.insert(meme.symbol.clone());
            }
        }
    }
}

/// Derive every wallet trait from fetched ledger data.
///
/// `planet_tier` is left at its default; [`build_snapshot`] fills it in.
pub fn aggregate_traits(
    activity: &AccountActivity,
    assets: &[AssetRecord],
    holdings: &[TokenAccountHolding],
    now: DateTime<Utc>,
) -> WalletTraits {
    let mut tally = Tally::default();

    for asset in assets {
        let classified = classify_asset(asset);
        tally.count(&classified);
        tally.mark(&classified);
    }

    // Token accounts the indexer missed
    for holding in holdings.iter().filter(|h| h.ui_amount > 0.0) {
        let classified = classify_holding(holding);
        tally.count(&classified);
        tally.mark(&classified);
    }

    let sol_balance = activity.lamports as f64 / LAMPORTS_PER_SOL;
    let wallet_age_days = activity
        .oldest_block_time
        .map(|t| days_between(t, now))
        .unwrap_or(0);
    let days_since_last_tx = activity.newest_block_time.map(|t| days_between(t, now));
    let tx_count = activity.tx_count;
    let avg_tx_per_day_30d = tx_count as f64 / wallet_age_days.max(1) as f64;

    let has_combo = tally.seeker && tally.preorder;

    WalletTraits {
        sol_balance,
        wallet_age_days,
        tx_count,
        unique_token_count: tally.tokens,
        nft_count: tally.nfts,
        avg_tx_per_day_30d,
        has_seeker: tally.seeker,
        has_preorder: tally.preorder,
        has_combo,
        is_og: sol_balance >= 5.0 && wallet_age_days >= 730 && tx_count >= 1000,
        is_whale: sol_balance >= 50.0,
        is_collector: tally.nfts >= 10,
        is_early_adopter: wallet_age_days >= 730,
        is_tx_titan: tx_count > 1000,
        is_solana_maxi: sol_balance >= 100.0 && tx_count > 100,
        is_blue_chip: tally.blue_chip,
        is_defi_king: tally.liquid_staking || tally.defi,
        is_meme_lord: tally.meme_value_usd >= MEME_LORD_THRESHOLD_USD,
        hyperactive_degen: avg_tx_per_day_30d >= HYPERACTIVE_TX_PER_DAY,
        diamond_hands: wallet_age_days >= DIAMOND_HANDS_DAYS,
        planet_tier: TierLabel::Mercury,
        meme_coins_held: tally.meme_symbols.into_iter().collect(),
        meme_value_usd: tally.meme_value_usd,
        days_since_last_tx,
        total_assets_count: assets.len() as u64,
        sol_tier: SolTier::from_balance(sol_balance),
    }
}

/// Aggregate, score and tier a wallet in one step
pub fn build_snapshot(
    address: &str,
    activity: &AccountActivity,
    assets: &[AssetRecord],
    holdings: &[TokenAccountHolding],
    now: DateTime<Utc>,
) -> WalletSnapshot {
    let mut traits = aggregate_traits(activity, assets, holdings, now);
    let score = scoring::calculate_score(&traits);
    let tier = scoring::tier_for(score, traits.has_combo);
    traits.planet_tier = tier;

    WalletSnapshot {
        address: address.to_string(),
        score,
        tier,
        traits,
        error: None,
    }
}

/// Whole days from a unix timestamp to `now`; never negative
fn days_between(unix_seconds: i64, now: DateTime<Utc>) -> u64 {
    let elapsed = now.timestamp().saturating_sub(unix_seconds);
    (elapsed.max(0) / SECONDS_PER_DAY) as u64
}
