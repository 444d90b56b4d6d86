//! Known on-chain addresses and scoring constants
//!
//! Everything here is fixed data: mint addresses, collection addresses and
//! the point tables the scoring engine reads. Nothing is user supplied.

use crate::models::TierLabel;

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Canonical score ceiling
pub const MAX_SCORE: u32 = 1400;

// =============================================================================
// Ledger query limits
// =============================================================================

/// Signatures requested per `getSignaturesForAddress` page
pub const SIGNATURE_PAGE_LIMIT: usize = 1000;

/// Maximum number of signature pages fetched per scan (10,000 tx cap)
pub const MAX_SIGNATURE_PAGES: usize = 10;

/// Page size for the DAS `getAssetsByOwner` query
pub const ASSET_PAGE_LIMIT: u32 = 1000;

/// SPL token program used for the fallback token-account scan
pub const SPL_TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

// =============================================================================
// Seeker / Chapter 2 addresses
// =============================================================================

pub const SEEKER_GENESIS_COLLECTION: &str = "GT22s89nU4iWFkNXj1Bw6uYhJJWDRPpShHt4Bk8f99Te";
pub const SEEKER_MINT_AUTHORITY: &str = "GT2zuHVaZQYZSyQMgJPLzvkmyztfyXg2NJunqFp4p3A4";
pub const CHAPTER2_PREORDER_MINT: &str = "2DMMamkkxQ6zDMBtkFp8KH7FoWzBMBA1CGTYwom4QH6Z";
pub const CHAPTER2_PREORDER_COLLECTION: &str = "3uejyD3ZwHDGwT8n6KctN3Stnjn9Nih79oXES9VqA38D";

// =============================================================================
// Token tables
// =============================================================================

/// Meme token mints with a static USD price used for the meme-lord check
pub const MEME_COINS: [(&str, &str, f64); 4] = [
    ("BONK", "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", 0.000002),
    ("WIF", "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm", 3.5),
    ("POPCAT", "7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr", 0.35),
    ("MEW", "MEW1VNoNHn99uH86fUvYvU42o9YkS9uH9Tst6t2291", 0.003),
];

/// Notional meme holdings (USD) required for `is_meme_lord`
pub const MEME_LORD_THRESHOLD_USD: f64 = 10.0;

/// Liquid staking token mints (JitoSOL, mSOL, bSOL)
pub const LST_MINTS: [&str; 3] = [
    "J1toso1uCk3RLmjorhTtrVwY9HJ7X8V9yYac6Y7kGCPn",
    "mSoLzYCxHdYgdzU16g5QSh3i5K3z3KZK7ytfqcJm7So",
    "BSo13v7qDMGWCM1cW8wwfsfZ7vQLZKxHCiNSN2B7Mq2u",
];

/// Lower-case protocol names that mark a DeFi position when found in an asset name
pub const DEFI_POSITION_HINTS: [&str; 7] =
    ["kamino", "drift", "marginfi", "mango", "jito", "solend", "zeta"];

/// Blue-chip NFT collection addresses
pub const BLUE_CHIP_COLLECTIONS: [&str; 20] = [
    "J1S9H3QjnRtBbbuD4HjPV6RpRhwuk4zKbxsnCHuTgh9w", // Mad Lads
    "SMBH3wF6pdt967Y62N7S5mB4tJSTH3KAsdJ82D3L2nd",  // SMB Gen2
    "SMB3ndYpSXY97H8MhpxYit3pD8TzYJ5v6ndP4D2L2nd",  // SMB Gen3
    "6v9UWGmEB5Hthst9KqEAgXW6XF6R6yv4t7Yf3YfD3A7t", // Claynosaurz
    "BUjZjAS2vbbb9p56fAun4sFmPAt8W6JURG5L3AkVvHP9", // Famous Fox Federation
    "4S8L8L1M5E1X5vM1Y1M1X5vM1Y1M1X5vM1Y1M1X5vM1Y", // Tensorians
    "7TENEKwBnkpENuefriGPg4hBDR4WJ2Gyfw5AhdkMA4rq", // Okay Bears
    "9uBX3ASuCtv6S5o56yq7F9n7U6o9o7o9o7o9o7o9o7o9", // Degen Ape Academy
    "GGSGP689TGoX6WJ9mSj2S8mH78S8S8S8S8S8S8S8S8S8S", // Galactic Geckos
    "CDgbhX61QFADQAeeYKP5BQ7nnzDyMkkR3NEhYF2ETn1k", // Taiyo Robotics
    "Port7uDYB3P8meS5m7Yv62222222222222222222222",  // Portals
    "CocMmG5v88888888888888888888888888888888888",  // Cets on Creck
    "y00t9S9mD9mD9mD9mD9mD9mD9mD9mD9mD9mD9mD9mD",   // y00ts
    "abc777777777777777777777777777777777777777",   // ABC
    "LILY5555555555555555555555555555555555555",    // LILY
    "PRM77777777777777777777777777777777777777",    // Primates
    "Jelly8888888888888888888888888888888888888",   // Jelly Rascals
    "4Q2C5S930M9c9e96b",                            // Froganas
    "TFF77777777777777777777777777777777777777",    // TFF
    "DTP77777777777777777777777777777777777777",    // DTP
];

// =============================================================================
// Bonus points
// =============================================================================

pub const SEEKER_GENESIS_BONUS: f64 = 200.0;
pub const CHAPTER2_PREORDER_BONUS: f64 = 150.0;
pub const COMBO_BONUS: f64 = 200.0;
pub const BLUE_CHIP_BONUS: f64 = 50.0;
pub const MEME_LORD_BONUS: f64 = 30.0;
pub const DEFI_KING_BONUS: f64 = 30.0;
pub const DIAMOND_HANDS_BONUS: f64 = 50.0;
pub const HYPERACTIVE_BONUS: f64 = 50.0;

/// Average tx/day at which a wallet counts as a hyperactive degen
pub const HYPERACTIVE_TX_PER_DAY: f64 = 8.0;

/// Wallet age (days) required for diamond hands
pub const DIAMOND_HANDS_DAYS: u64 = 60;

// =============================================================================
// Band tables, highest band first
// =============================================================================

/// SOL balance bands (inclusive lower bound, points)
pub const SOL_BALANCE_BANDS: [(f64, f64); 5] =
    [(10.0, 100.0), (5.0, 85.0), (1.0, 60.0), (0.5, 40.0), (0.1, 20.0)];

/// Wallet age bands (exclusive lower bound in days, points)
pub const WALLET_AGE_BANDS: [(u64, f64); 6] = [
    (730, 250.0),
    (365, 180.0),
    (180, 120.0),
    (90, 70.0),
    (30, 35.0),
    (7, 15.0),
];

/// Transaction count bands (exclusive lower bound, points)
pub const TX_COUNT_BANDS: [(u64, f64); 6] = [
    (5000, 200.0),
    (2000, 160.0),
    (1000, 120.0),
    (500, 80.0),
    (100, 50.0),
    (50, 30.0),
];

/// Points per transaction below the lowest tx band, and their cap
pub const TX_COUNT_MULTIPLIER: f64 = 0.5;
pub const TX_COUNT_FLOOR_CAP: f64 = 25.0;

/// NFT count bands (exclusive lower bound, points)
pub const NFT_COUNT_BANDS: [(u64, f64); 4] = [(100, 80.0), (50, 60.0), (20, 40.0), (5, 20.0)];

/// Planet tier thresholds (inclusive lower score bound), highest first
pub const TIER_THRESHOLDS: [(u32, TierLabel); 8] = [
    (1051, TierLabel::Sun),
    (951, TierLabel::Jupiter),
    (851, TierLabel::Saturn),
    (701, TierLabel::Uranus),
    (551, TierLabel::Neptune),
    (401, TierLabel::Earth),
    (251, TierLabel::Venus),
    (101, TierLabel::Mars),
];

/// Look up a meme token by mint, returning its symbol and static USD price
pub fn meme_coin(mint: &str) -> Option<(&'static str, f64)> {
    MEME_COINS
        .iter()
        .find(|(_, m, _)| *m == mint)
        .map(|(symbol, _, price)| (*symbol, *price))
}

pub fn is_lst_mint(mint: &str) -> bool {
    LST_MINTS.contains(&mint)
}

pub fn is_blue_chip_collection(collection: &str) -> bool {
    BLUE_CHIP_COLLECTIONS.contains(&collection)
}
