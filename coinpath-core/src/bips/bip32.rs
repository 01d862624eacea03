// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! BIP32
//!
//! <https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki>

pub use bitcoin::util::bip32::*;
use bitcoin::secp256k1::{Secp256k1, Signing};
use bitcoin::Network;

use crate::SECP256K1;

/// Index at which hardened keys start.
///
/// Each extended key has 2^31 normal children in `[0, 2^31 - 1]` and
/// 2^31 hardened children in `[2^31, 2^32 - 1]`.
pub const HARDENED_KEY_START: u32 = 0x80000000;

pub trait Bip32 {
    type Err;

    fn to_bip32_root_key(&self, network: Network) -> Result<ExtendedPrivKey, Self::Err>;

    fn fingerprint<C>(
        &self,
        network: Network,
        secp: &Secp256k1<C>,
    ) -> Result<Fingerprint, Self::Err>
    where
        C: Signing,
    {
        let root: ExtendedPrivKey = self.to_bip32_root_key(network)?;
        Ok(root.fingerprint(secp))
    }
}

pub const fn is_hardened(index: u32) -> bool {
    index & HARDENED_KEY_START != 0
}

/// Add the hardening offset to a logical index.
///
/// Returns `None` if `index` is already in the hardened range.
pub const fn harden(index: u32) -> Option<u32> {
    if is_hardened(index) {
        None
    } else {
        Some(index | HARDENED_KEY_START)
    }
}

/// Strip the hardening offset
pub const fn unharden(index: u32) -> u32 {
    index & !HARDENED_KEY_START
}

/// Derive a single private child.
///
/// Hardened derivation is used when `index >= HARDENED_KEY_START`.
pub fn derive_child(parent: &ExtendedPrivKey, index: u32) -> Result<ExtendedPrivKey, Error> {
    parent.ckd_priv(&SECP256K1, ChildNumber::from(index))
}
