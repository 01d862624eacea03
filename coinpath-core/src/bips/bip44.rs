// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! BIP44
//!
//! <https://github.com/bitcoin/bips/blob/master/bip-0044.mediawiki>
//!
//! Path: `m / purpose' / coin_type' / account' / chain / address_index`

use core::fmt;
use core::str::FromStr;

use bitcoin::Network;
use serde::de::Error as DeserializerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::bip32::{self, Bip32, ChildNumber, DerivationPath, ExtendedPrivKey, HARDENED_KEY_START};
use crate::error::{DerivationError, Error, Result};
use crate::slips::slip44::CoinType;
use crate::types::Seed;

/// `44'`, following the BIP43 recommendation.
pub const PURPOSE: u32 = 0x8000002C;
/// Maximum allowed account number.
///
/// Accounts are hardened children, so they can't exceed the hardened range.
/// The top of the range is reserved for imported addresses.
pub const MAX_ACCOUNT_NUM: u32 = HARDENED_KEY_START - 2;
/// Maximum allowed number of addresses per account and chain.
pub const MAX_ADDRESSES_PER_ACCOUNT: u32 = HARDENED_KEY_START - 1;
/// Hardened index of the default account (account `0'`)
pub const DEFAULT_ACCOUNT_INDEX: u32 = HARDENED_KEY_START;
/// Chain used for receiving addresses
pub const EXTERNAL_BRANCH: u32 = 0;
/// Chain used for change addresses
pub const INTERNAL_BRANCH: u32 = 1;

/// Level of a BIP44 path, in derivation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Purpose,
    CoinType,
    Account,
    Chain,
    AddressIndex,
}

impl Level {
    /// Depth of the key produced at this level (master is `0`)
    pub fn depth(&self) -> u8 {
        *self as u8 + 1
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Purpose => write!(f, "purpose"),
            Self::CoinType => write!(f, "coin_type"),
            Self::Account => write!(f, "account"),
            Self::Chain => write!(f, "chain"),
            Self::AddressIndex => write!(f, "address_index"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Chain {
    /// Receiving addresses
    #[default]
    External = EXTERNAL_BRANCH,
    /// Change addresses
    Internal = INTERNAL_BRANCH,
}

impl Chain {
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    pub fn is_change(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

impl TryFrom<u32> for Chain {
    type Error = DerivationError;

    fn try_from(chain: u32) -> Result<Self, Self::Error> {
        match chain {
            EXTERNAL_BRANCH => Ok(Self::External),
            INTERNAL_BRANCH => Ok(Self::Internal),
            c => Err(DerivationError::InvalidChain(c)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedDerivationPathError {
    Purpose(Option<ChildNumber>),
    Coin(Option<ChildNumber>),
    Account(Option<ChildNumber>),
    Change(Option<ChildNumber>),
    AddressIndex(Option<ChildNumber>),
    TooDeep(usize),
}

impl std::error::Error for UnsupportedDerivationPathError {}

impl fmt::Display for UnsupportedDerivationPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Purpose(p) => match p {
                Some(p) => write!(f, "`{p}` purpose is not supported"),
                None => write!(f, "unknown purpose"),
            },
            Self::Coin(c) => match c {
                Some(c) => write!(f, "`{c}` coin is not supported"),
                None => write!(f, "unknown coin"),
            },
            Self::Account(a) => match a {
                Some(a) => write!(f, "`{a}` account index is not supported"),
                None => write!(f, "unknown account index"),
            },
            Self::Change(c) => match c {
                Some(c) => write!(f, "`{c}` change is not supported"),
                None => write!(f, "unknown change"),
            },
            Self::AddressIndex(i) => match i {
                Some(i) => write!(f, "`{i}` address index is not supported"),
                None => write!(f, "unknown address index"),
            },
            Self::TooDeep(depth) => write!(f, "expected 5 levels, got {depth}"),
        }
    }
}

/// Validated `m / 44' / coin_type' / account' / chain / address_index` path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bip44Path {
    coin: CoinType,
    account: u32,
    chain: Chain,
    address_index: u32,
}

impl Bip44Path {
    /// Build a path, checking every component against its legal range.
    ///
    /// `account` must already be hardened: account `0'` is [`DEFAULT_ACCOUNT_INDEX`].
    pub fn new(coin: CoinType, account: u32, chain: u32, address_index: u32) -> Result<Self> {
        if !bip32::is_hardened(account) {
            return Err(Error::derivation(
                Level::Account,
                DerivationError::NotHardened(account),
            ));
        }

        if bip32::unharden(account) > MAX_ACCOUNT_NUM {
            return Err(Error::derivation(
                Level::Account,
                DerivationError::OutOfRange {
                    index: account,
                    max: HARDENED_KEY_START + MAX_ACCOUNT_NUM,
                },
            ));
        }

        let chain = Chain::try_from(chain).map_err(|e| Error::derivation(Level::Chain, e))?;

        if address_index > MAX_ADDRESSES_PER_ACCOUNT {
            return Err(Error::derivation(
                Level::AddressIndex,
                DerivationError::OutOfRange {
                    index: address_index,
                    max: MAX_ADDRESSES_PER_ACCOUNT,
                },
            ));
        }

        Ok(Self {
            coin,
            account,
            chain,
            address_index,
        })
    }

    pub fn coin(&self) -> CoinType {
        self.coin
    }

    /// Hardened account index
    pub fn account(&self) -> u32 {
        self.account
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn address_index(&self) -> u32 {
        self.address_index
    }

    /// Child indexes, in derivation order
    pub fn indices(&self) -> [(Level, u32); 5] {
        [
            (Level::Purpose, PURPOSE),
            (Level::CoinType, self.coin.index()),
            (Level::Account, self.account),
            (Level::Chain, self.chain.as_u32()),
            (Level::AddressIndex, self.address_index),
        ]
    }

    /// Same account and chain, next address. `None` once the chain is exhausted.
    pub fn next_address(&self) -> Option<Self> {
        if self.address_index >= MAX_ADDRESSES_PER_ACCOUNT {
            None
        } else {
            Some(Self {
                address_index: self.address_index + 1,
                ..*self
            })
        }
    }

    pub fn to_derivation_path(&self) -> DerivationPath {
        let path: Vec<ChildNumber> = self
            .indices()
            .into_iter()
            .map(|(_, index)| ChildNumber::from(index))
            .collect();
        DerivationPath::from(path)
    }

    pub fn from_derivation_path(path: &DerivationPath) -> Result<Self> {
        let children: &[ChildNumber] = path.as_ref();
        if children.len() > 5 {
            return Err(UnsupportedDerivationPathError::TooDeep(children.len()).into());
        }

        let mut path = children.iter();

        match path.next() {
            Some(ChildNumber::Hardened { index: 44 }) => (),
            p => return Err(UnsupportedDerivationPathError::Purpose(p.copied()).into()),
        };

        let coin: CoinType = match path.next() {
            Some(ChildNumber::Hardened { index }) => CoinType::from_coin_index(*index)?,
            c => return Err(UnsupportedDerivationPathError::Coin(c.copied()).into()),
        };

        let account: u32 = match path.next() {
            Some(ChildNumber::Hardened { index }) => index | HARDENED_KEY_START,
            a => return Err(UnsupportedDerivationPathError::Account(a.copied()).into()),
        };

        let chain: u32 = match path.next() {
            Some(ChildNumber::Normal { index }) => *index,
            c => return Err(UnsupportedDerivationPathError::Change(c.copied()).into()),
        };

        let address_index: u32 = match path.next() {
            Some(ChildNumber::Normal { index }) => *index,
            i => return Err(UnsupportedDerivationPathError::AddressIndex(i.copied()).into()),
        };

        Self::new(coin, account, chain, address_index)
    }

    /// Apply the five derivation steps to `master`.
    ///
    /// Stops at the first failing step; the error carries its [`Level`].
    pub fn derive(&self, master: &ExtendedPrivKey) -> Result<ExtendedPrivKey> {
        log::debug!("Deriving {self}");
        self.indices()
            .into_iter()
            .try_fold(*master, |parent, (level, index)| {
                log::trace!("Deriving {level} child {index:#010x}");
                bip32::derive_child(&parent, index).map_err(|e| {
                    log::warn!("Derivation of {self} failed at {level}: {e}");
                    Error::derivation(level, e)
                })
            })
    }
}

impl fmt::Display for Bip44Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_derivation_path())
    }
}

impl FromStr for Bip44Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = DerivationPath::from_str(s).map_err(Error::InvalidPath)?;
        Self::from_derivation_path(&path)
    }
}

impl Serialize for Bip44Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Bip44Path {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let path: String = String::deserialize(deserializer)?;
        Self::from_str(&path).map_err(DeserializerError::custom)
    }
}

/// Derive `m / 44' / coin' / account' / chain / address_index` from a master key
pub fn new_key_from_master_key(
    master: &ExtendedPrivKey,
    coin: CoinType,
    account: u32,
    chain: u32,
    address_index: u32,
) -> Result<ExtendedPrivKey> {
    Bip44Path::new(coin, account, chain, address_index)?.derive(master)
}

/// Derive `m / 44' / coin' / account' / chain / address_index` from a BIP39 mnemonic.
///
/// Keys are serialized for [`Network::Bitcoin`] (`xprv`).
pub fn new_key_from_mnemonic<S>(
    mnemonic: S,
    coin: CoinType,
    account: u32,
    chain: u32,
    address_index: u32,
    passphrase: &str,
) -> Result<ExtendedPrivKey>
where
    S: AsRef<str>,
{
    new_key_from_mnemonic_with_network(
        mnemonic,
        coin,
        account,
        chain,
        address_index,
        passphrase,
        Network::Bitcoin,
    )
}

/// Like [`new_key_from_mnemonic`], serializing keys for `network`.
///
/// The network only affects the version bytes, not the derived key material.
pub fn new_key_from_mnemonic_with_network<S>(
    mnemonic: S,
    coin: CoinType,
    account: u32,
    chain: u32,
    address_index: u32,
    passphrase: &str,
    network: Network,
) -> Result<ExtendedPrivKey>
where
    S: AsRef<str>,
{
    let seed = Seed::parse(mnemonic, Some(passphrase))?;
    let master: ExtendedPrivKey = seed.to_bip32_root_key(network)?;
    new_key_from_master_key(&master, coin, account, chain, address_index)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use bitcoin::hashes::hex::FromHex;

    use super::*;

    const SEED: &str = "a672b4fb616c21b756729a30f014a86884b7ff9a5331f4082641d0d996a351956b5fa107aed15af12ffeba71ce00964cc889e5b3caead16cd991cff51f5bb52a";
    const MNEMONIC: &str =
        "element fence situate special wrap snack method volcano busy ribbon neck sphere";

    fn master() -> ExtendedPrivKey {
        let seed: Vec<u8> = Vec::from_hex(SEED).unwrap();
        ExtendedPrivKey::new_master(Network::Bitcoin, &seed).unwrap()
    }

    #[test]
    fn test_constants() {
        assert_eq!(HARDENED_KEY_START, 1 << 31);
        assert_eq!(PURPOSE, HARDENED_KEY_START + 44);
        assert!(bip32::is_hardened(PURPOSE));
        assert_eq!(MAX_ACCOUNT_NUM, 2147483646);
        assert_eq!(MAX_ADDRESSES_PER_ACCOUNT, 2147483647);
        assert_eq!(DEFAULT_ACCOUNT_INDEX, HARDENED_KEY_START);
        assert!(!bip32::is_hardened(EXTERNAL_BRANCH));
        assert!(!bip32::is_hardened(INTERNAL_BRANCH));
        assert_eq!(Chain::External.as_u32(), EXTERNAL_BRANCH);
        assert_eq!(Chain::Internal.as_u32(), INTERNAL_BRANCH);
    }

    #[test]
    fn test_new_key_from_master_key() -> Result<()> {
        let key = new_key_from_master_key(
            &master(),
            CoinType::BITCOIN,
            DEFAULT_ACCOUNT_INDEX,
            EXTERNAL_BRANCH,
            0,
        )?;
        assert_eq!(key.to_string(), "xprvA42zRf7QytGacrzkvDJkqtZKiy4bZuDLXmwFaCaFTCtd5Y71eqgcSq5uszqUSdGj5vDFuRxGVoAqaQVZevxNiLjCsrzWdUYqSa4MfpjAAeU");
        assert_eq!(key.depth, Level::AddressIndex.depth());
        Ok(())
    }

    #[test]
    fn test_matches_single_level_derivation() -> Result<()> {
        let master = master();
        let key = new_key_from_master_key(
            &master,
            CoinType::ETHER,
            DEFAULT_ACCOUNT_INDEX + 3,
            INTERNAL_BRANCH,
            42,
        )?;

        let mut manual = master;
        for index in [PURPOSE, 0x8000003c, 0x80000003, 1, 42] {
            manual = bip32::derive_child(&manual, index).unwrap();
        }
        assert_eq!(key, manual);

        let path = DerivationPath::from_str("m/44'/60'/3'/1/42").unwrap();
        assert_eq!(key, master.derive_priv(&crate::SECP256K1, &path).unwrap());
        Ok(())
    }

    #[test]
    fn test_deterministic() -> Result<()> {
        let path = Bip44Path::new(CoinType::LITECOIN, DEFAULT_ACCOUNT_INDEX, 0, 7)?;
        let a = path.derive(&master())?;
        let b = path.derive(&master())?;
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
        Ok(())
    }

    #[test]
    fn test_account_must_be_hardened() {
        let master = master();

        let coin = CoinType::BITCOIN;
        assert!(new_key_from_master_key(&master, coin, DEFAULT_ACCOUNT_INDEX, 0, 0).is_ok());

        // Account `0` (unhardened) is rejected instead of deriving m/44'/0'/0/0/0
        let err = new_key_from_master_key(&master, coin, 0, 0, 0).unwrap_err();
        assert_eq!(
            err,
            Error::Derivation {
                level: Level::Account,
                error: DerivationError::NotHardened(0),
            }
        );
        assert_eq!(err.level(), Some(Level::Account));
    }

    #[test]
    fn test_bounds() {
        let coin = CoinType::BITCOIN;

        assert!(Bip44Path::new(coin, HARDENED_KEY_START + MAX_ACCOUNT_NUM, 0, 0).is_ok());
        assert_eq!(
            Bip44Path::new(coin, u32::MAX, 0, 0).unwrap_err(),
            Error::Derivation {
                level: Level::Account,
                error: DerivationError::OutOfRange {
                    index: u32::MAX,
                    max: u32::MAX - 1,
                },
            }
        );

        assert_eq!(
            Bip44Path::new(coin, DEFAULT_ACCOUNT_INDEX, 2, 0).unwrap_err(),
            Error::Derivation {
                level: Level::Chain,
                error: DerivationError::InvalidChain(2),
            }
        );

        let last = MAX_ADDRESSES_PER_ACCOUNT;
        assert!(Bip44Path::new(coin, DEFAULT_ACCOUNT_INDEX, 1, last).is_ok());
        assert_eq!(
            Bip44Path::new(coin, DEFAULT_ACCOUNT_INDEX, 1, HARDENED_KEY_START).unwrap_err(),
            Error::Derivation {
                level: Level::AddressIndex,
                error: DerivationError::OutOfRange {
                    index: HARDENED_KEY_START,
                    max: MAX_ADDRESSES_PER_ACCOUNT,
                },
            }
        );
    }

    #[test]
    fn test_new_key_from_mnemonic() -> Result<()> {
        let btc = new_key_from_mnemonic(MNEMONIC, CoinType::BITCOIN, 2147483648, 0, 19, "")?;
        assert_eq!(btc.private_key.secret_bytes().len(), 32);
        assert_eq!(btc.depth, 5);
        assert_eq!(btc.child_number, ChildNumber::Normal { index: 19 });

        let factoids =
            new_key_from_mnemonic(MNEMONIC, CoinType::FACTOM_FACTOIDS, 2147483648, 1, 19, "")?;
        assert_eq!(factoids.private_key.secret_bytes().len(), 32);
        assert_ne!(
            btc.private_key.secret_bytes(),
            factoids.private_key.secret_bytes()
        );

        // Same as going through the seed by hand
        let seed = Seed::parse(MNEMONIC, None)?;
        let master = seed.to_bip32_root_key(Network::Bitcoin)?;
        assert_eq!(
            btc,
            new_key_from_master_key(&master, CoinType::BITCOIN, 2147483648, 0, 19)?
        );
        Ok(())
    }

    #[test]
    fn test_new_key_from_mnemonic_with_network() -> Result<()> {
        let mainnet =
            new_key_from_mnemonic(MNEMONIC, CoinType::TESTNET, DEFAULT_ACCOUNT_INDEX, 0, 0, "")?;
        let testnet = new_key_from_mnemonic_with_network(
            MNEMONIC,
            CoinType::TESTNET,
            DEFAULT_ACCOUNT_INDEX,
            0,
            0,
            "",
            Network::Testnet,
        )?;
        assert!(mainnet.to_string().starts_with("xprv"));
        assert!(testnet.to_string().starts_with("tprv"));
        assert_eq!(mainnet.private_key, testnet.private_key);
        assert_eq!(mainnet.chain_code, testnet.chain_code);
        Ok(())
    }

    #[test]
    fn test_invalid_mnemonic_is_seed_error() {
        // Checked before the (also invalid) account
        let err = new_key_from_mnemonic(
            "element fence situate special wrap snack method volcano busy ribbon neck xyzzy",
            CoinType::BITCOIN,
            0,
            0,
            0,
            "",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Seed(_)), "{err}");
        assert_eq!(err.level(), None);
    }

    #[test]
    fn test_path_parsing() -> Result<()> {
        let path = Bip44Path::from_str("m/44'/60'/0'/1/5")?;
        assert_eq!(path.coin(), CoinType::ETHER);
        assert_eq!(path.account(), DEFAULT_ACCOUNT_INDEX);
        assert_eq!(path.chain(), Chain::Internal);
        assert!(path.chain().is_change());
        assert_eq!(path.address_index(), 5);
        assert_eq!(path.to_string(), "m/44'/60'/0'/1/5");

        assert_eq!(
            Bip44Path::from_str("m/49'/0'/0'/0/0").unwrap_err(),
            Error::UnsupportedDerivationPath(UnsupportedDerivationPathError::Purpose(Some(
                ChildNumber::Hardened { index: 49 }
            )))
        );
        assert_eq!(
            Bip44Path::from_str("m/44'/0'/0/0/0").unwrap_err(),
            Error::UnsupportedDerivationPath(UnsupportedDerivationPathError::Account(Some(
                ChildNumber::Normal { index: 0 }
            )))
        );
        assert_eq!(
            Bip44Path::from_str("m/44'/0'/0'/0'/0").unwrap_err(),
            Error::UnsupportedDerivationPath(UnsupportedDerivationPathError::Change(Some(
                ChildNumber::Hardened { index: 0 }
            )))
        );
        assert_eq!(
            Bip44Path::from_str("m/44'/0'/0'/0").unwrap_err(),
            Error::UnsupportedDerivationPath(UnsupportedDerivationPathError::AddressIndex(None))
        );
        assert_eq!(
            Bip44Path::from_str("m/44'/0'/0'/0/0/0").unwrap_err(),
            Error::UnsupportedDerivationPath(UnsupportedDerivationPathError::TooDeep(6))
        );
        assert_eq!(
            Bip44Path::from_str("m/44'/0'/0'/2/0").unwrap_err().level(),
            Some(Level::Chain)
        );
        assert!(matches!(
            Bip44Path::from_str("m/44'/x'/0'/0/0"),
            Err(Error::InvalidPath(_))
        ));
        Ok(())
    }

    #[test]
    fn test_next_address() -> Result<()> {
        let path = Bip44Path::new(CoinType::DASH, DEFAULT_ACCOUNT_INDEX, 0, 0)?;
        let next = path.next_address().unwrap();
        assert_eq!(next.address_index(), 1);
        assert_eq!(next.coin(), path.coin());
        assert_eq!(next.chain(), path.chain());

        let last = Bip44Path::new(
            CoinType::DASH,
            DEFAULT_ACCOUNT_INDEX,
            0,
            MAX_ADDRESSES_PER_ACCOUNT,
        )?;
        assert_eq!(last.next_address(), None);
        Ok(())
    }

    #[test]
    fn test_concurrent_derivation() -> Result<()> {
        let master = master();
        let coin = CoinType::BITCOIN;
        let sequential: Vec<ExtendedPrivKey> = (0..8)
            .map(|i| new_key_from_master_key(&master, coin, DEFAULT_ACCOUNT_INDEX, 0, i))
            .collect::<Result<_>>()?;

        let concurrent: Vec<ExtendedPrivKey> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let master = &master;
                    s.spawn(move || new_key_from_master_key(master, coin, DEFAULT_ACCOUNT_INDEX, 0, i))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect::<Result<Vec<ExtendedPrivKey>>>()
        })?;

        assert_eq!(sequential, concurrent);
        Ok(())
    }

    #[test]
    fn test_serde() -> Result<()> {
        let path = Bip44Path::new(CoinType::ZCASH, DEFAULT_ACCOUNT_INDEX + 1, 0, 3)?;
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"m/44'/133'/1'/0/3\"");
        assert_eq!(serde_json::from_str::<Bip44Path>(&json).unwrap(), path);
        assert!(serde_json::from_str::<Bip44Path>("\"m/44'/133'/1'/0\"").is_err());
        Ok(())
    }
}
