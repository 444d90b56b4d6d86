//! Scoring engine
//!
//! Turns a trait record into a numeric score and a planet tier. Scoring is a
//! pure function of the traits: bands are additive and independent, the only
//! interaction being the combo override on the tier.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::models::{TierLabel, WalletTraits};

/// Score, tier and badges for one trait record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub score: u32,
    pub tier: TierLabel,
    pub badges: Vec<String>,
}

/// Score a trait record. Always within `[0, MAX_SCORE]`.
pub fn calculate_score(traits: &WalletTraits) -> u32 {
    let mut score = 0.0;

    score += sol_balance_points(traits.sol_balance);
    score += band_points(traits.wallet_age_days, &WALLET_AGE_BANDS);
    score += tx_count_points(traits.tx_count);
    score += band_points(traits.nft_count, &NFT_COUNT_BANDS);

    let bonuses = [
        (traits.has_seeker, SEEKER_GENESIS_BONUS),
        (traits.has_preorder, CHAPTER2_PREORDER_BONUS),
        (traits.has_combo, COMBO_BONUS),
        (traits.is_blue_chip, BLUE_CHIP_BONUS),
        (traits.is_defi_king, DEFI_KING_BONUS),
        (traits.diamond_hands, DIAMOND_HANDS_BONUS),
        (traits.hyperactive_degen, HYPERACTIVE_BONUS),
        (traits.is_meme_lord, MEME_LORD_BONUS),
    ];
    score += bonuses
        .iter()
        .filter(|(held, _)| *held)
        .map(|(_, points)| points)
        .sum::<f64>();

    (score.round().max(0.0) as u32).min(MAX_SCORE)
}

/// Planet tier for a score. Combo holders always get `BinarySun`.
pub fn tier_for(score: u32, has_combo: bool) -> TierLabel {
    if has_combo {
        return TierLabel::BinarySun;
    }

    TIER_THRESHOLDS
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(TierLabel::Mercury)
}

/// Badge names in display order
pub fn badges(traits: &WalletTraits) -> Vec<String> {
    [
        (traits.is_og, "og"),
        (traits.is_whale, "whale"),
        (traits.is_collector, "collector"),
        (traits.has_combo, "binary"),
        (traits.is_early_adopter, "early"),
        (traits.is_tx_titan, "titan"),
        (traits.is_solana_maxi, "maxi"),
        (traits.has_seeker, "seeker"),
        (traits.has_preorder, "visionary"),
        (traits.diamond_hands, "diamond_hands"),
        (traits.hyperactive_degen, "degen"),
        (traits.is_meme_lord, "meme_lord"),
        (traits.is_defi_king, "defi_king"),
    ]
    .into_iter()
    .filter(|(held, _)| *held)
    .map(|(_, name)| name.to_string())
    .collect()
}

/// Score, tier and badges in one pass
pub fn evaluate(traits: &WalletTraits) -> Identity {
    let score = calculate_score(traits);
    Identity {
        score,
        tier: tier_for(score, traits.has_combo),
        badges: badges(traits),
    }
}

fn sol_balance_points(sol: f64) -> f64 {
    SOL_BALANCE_BANDS
        .iter()
        .find(|(min, _)| sol >= *min)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}

fn tx_count_points(tx_count: u64) -> f64 {
    let banded = band_points(tx_count, &TX_COUNT_BANDS);
    if banded > 0.0 {
        banded
    } else {
        (tx_count as f64 * TX_COUNT_MULTIPLIER).min(TX_COUNT_FLOOR_CAP)
    }
}

/// Points for the first band whose exclusive lower bound is exceeded
fn band_points(value: u64, bands: &[(u64, f64)]) -> f64 {
    bands
        .iter()
        .find(|(above, _)| value > *above)
        .map(|(_, points)| *points)
        .unwrap_or(0.0)
}
