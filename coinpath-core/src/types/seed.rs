// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use core::fmt;
use core::str::FromStr;

use bip39::Mnemonic;
use bitcoin::Network;
use serde::{Deserialize, Serialize};

use crate::bips::bip32::{Bip32, ExtendedPrivKey};
use crate::error::{Error, Result};

/// BIP39 mnemonic and optional passphrase
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    mnemonic: Mnemonic,
    passphrase: Option<String>,
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<sensitive>")
    }
}

impl Seed {
    pub fn new<S>(mnemonic: Mnemonic, passphrase: Option<S>) -> Self
    where
        S: Into<String>,
    {
        Self {
            mnemonic,
            passphrase: passphrase.map(|p| p.into()),
        }
    }

    pub fn from_mnemonic(mnemonic: Mnemonic) -> Self {
        Self {
            mnemonic,
            passphrase: None,
        }
    }

    /// Parse a mnemonic, checking word list and checksum
    pub fn parse<S>(mnemonic: S, passphrase: Option<&str>) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let mnemonic = Mnemonic::from_str(mnemonic.as_ref())?;
        Ok(Self::new(mnemonic, passphrase))
    }

    pub fn mnemonic(&self) -> Mnemonic {
        self.mnemonic.clone()
    }

    pub fn passphrase(&self) -> Option<String> {
        self.passphrase.clone()
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        self.mnemonic
            .to_seed(self.passphrase.as_deref().unwrap_or_default())
    }
}

impl FromStr for Seed {
    type Err = Error;

    fn from_str(mnemonic: &str) -> Result<Self, Self::Err> {
        Self::parse(mnemonic, None)
    }
}

impl Bip32 for Seed {
    type Err = Error;

    fn to_bip32_root_key(&self, network: Network) -> Result<ExtendedPrivKey, Self::Err> {
        ExtendedPrivKey::new_master(network, &self.to_bytes()).map_err(Error::MasterKey)
    }
}
