//! # Prism Core
//!
//! Wallet identity scoring for Identity Prism.
//!
//! This crate holds the pure half of the pipeline: decoding ledger asset
//! records, classifying them, aggregating wallet traits, and mapping those
//! traits to a score and planet tier. It performs no I/O.

pub mod aggregator;
pub mod classifier;
pub mod constants;
pub mod error;
pub mod mint;
pub mod models;
pub mod scoring;
pub mod store;

pub use aggregator::*;
pub use classifier::*;
pub use error::*;
pub use mint::*;
pub use models::*;
pub use scoring::*;
pub use store::*;
