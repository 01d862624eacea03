// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! BIP39
//!
//! <https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki>

use core::str::FromStr;

pub use bip39::*;

/// Parse `mnemonic` (word list and checksum) and stretch it with `passphrase`
/// into a 64-byte seed.
pub fn seed_from_mnemonic<S>(mnemonic: S, passphrase: &str) -> Result<[u8; 64], Error>
where
    S: AsRef<str>,
{
    let mnemonic = Mnemonic::from_str(mnemonic.as_ref())?;
    Ok(mnemonic.to_seed(passphrase))
}
