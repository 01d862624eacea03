// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

#![doc = include_str!("../README.md")]

pub extern crate bip39;
pub extern crate bitcoin;

use bitcoin::secp256k1::{All, Secp256k1};
use once_cell::sync::Lazy;

pub mod bips;
pub mod error;
pub mod slips;
pub mod types;

pub use self::bips::bip44::{
    new_key_from_master_key, new_key_from_mnemonic, new_key_from_mnemonic_with_network,
    Bip44Path, Chain, Level,
};
pub use self::error::{DerivationError, Error, Result};
pub use self::slips::slip44::CoinType;
pub use self::types::Seed;

/// Shared secp256k1 context. Read-only after initialization, so derivations
/// running on different threads can use it concurrently.
pub static SECP256K1: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);
