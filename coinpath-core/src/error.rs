// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use crate::bips::bip32;
use crate::bips::bip44::{Level, UnsupportedDerivationPathError};
use crate::slips::slip44;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure of a single derivation level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DerivationError {
    /// Child key derivation failed
    #[error("BIP32: {0}")]
    BIP32(#[from] bip32::Error),
    /// Index must be in the hardened range
    #[error("index {0:#010x} is not hardened")]
    NotHardened(u32),
    /// Index outside of the range allowed for its level
    #[error("index {index} is out of range (max {max})")]
    OutOfRange { index: u32, max: u32 },
    /// Chain is neither external nor internal
    #[error("chain must be 0 (external) or 1 (internal), got {0}")]
    InvalidChain(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Mnemonic or passphrase can't be converted into a seed
    #[error("Seed: {0}")]
    Seed(#[from] bip39::Error),
    /// Master key construction from seed failed
    #[error("Master key: {0}")]
    MasterKey(#[source] bip32::Error),
    /// Derivation failed at `level`
    #[error("Derivation at {level}: {error}")]
    Derivation {
        level: Level,
        #[source]
        error: DerivationError,
    },
    /// Coin type error
    #[error("Coin type: {0}")]
    CoinType(#[from] slip44::Error),
    /// Malformed derivation path
    #[error("Invalid derivation path: {0}")]
    InvalidPath(#[source] bip32::Error),
    /// Path is not a BIP44 path
    #[error("Unsupported derivation path: {0}")]
    UnsupportedDerivationPath(#[from] UnsupportedDerivationPathError),
}

impl Error {
    pub(crate) fn derivation<E>(level: Level, error: E) -> Self
    where
        E: Into<DerivationError>,
    {
        Self::Derivation {
            level,
            error: error.into(),
        }
    }

    /// Level at which the derivation failed, if this is a derivation error
    pub fn level(&self) -> Option<Level> {
        match self {
            Self::Derivation { level, .. } => Some(*level),
            _ => None,
        }
    }
}
