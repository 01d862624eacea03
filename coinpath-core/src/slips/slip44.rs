// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! SLIP-0044: registered coin types for BIP44
//!
//! <https://github.com/satoshilabs/slips/blob/master/slip-0044.md>
//!
//! Published values are never changed or reassigned: re-deriving a wallet with a
//! different `coin_type'` yields different keys. New coins are appended only.

use core::fmt;
use core::num::ParseIntError;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bips::bip32::{self, HARDENED_KEY_START};

/// Maximum logical coin type allowed by hardened derivation
pub const MAX_COIN_TYPE: u32 = HARDENED_KEY_START - 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("coin type {0:#010x} is not hardened")]
    NotHardened(u32),
    #[error("logical coin type {0} is out of range")]
    OutOfRange(u32),
    #[error("unknown coin type `{0}`")]
    Unknown(String),
    #[error(transparent)]
    ParseInt(#[from] ParseIntError),
}

/// Hardened `coin_type'` index of a BIP44 path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CoinType(u32);

macro_rules! coin_types {
    ($($ident:ident = $value:literal => $name:literal,)*) => {
        impl CoinType {
            $(
                #[doc = concat!("SLIP-0044 `", $name, "`")]
                pub const $ident: Self = Self($value);
            )*

            /// Every registered coin type, in ascending order
            pub const ALL: &'static [Self] = &[$(Self::$ident),*];

            /// Registered name, `None` for custom coin types
            pub fn name(&self) -> Option<&'static str> {
                match self.0 {
                    $($value => Some($name),)*
                    _ => None,
                }
            }
        }
    };
}

coin_types! {
    BITCOIN = 0x80000000 => "Bitcoin",
    TESTNET = 0x80000001 => "Testnet",
    LITECOIN = 0x80000002 => "Litecoin",
    DOGECOIN = 0x80000003 => "Dogecoin",
    REDDCOIN = 0x80000004 => "Reddcoin",
    DASH = 0x80000005 => "Dash",
    PEERCOIN = 0x80000006 => "Peercoin",
    NAMECOIN = 0x80000007 => "Namecoin",
    FEATHERCOIN = 0x80000008 => "Feathercoin",
    COUNTERPARTY = 0x80000009 => "Counterparty",
    BLACKCOIN = 0x8000000a => "Blackcoin",
    NUSHARES = 0x8000000b => "NuShares",
    NUBITS = 0x8000000c => "NuBits",
    MAZACOIN = 0x8000000d => "Mazacoin",
    VIACOIN = 0x8000000e => "Viacoin",
    CLEARINGHOUSE = 0x8000000f => "ClearingHouse",
    RUBYCOIN = 0x80000010 => "Rubycoin",
    GROESTLCOIN = 0x80000011 => "Groestlcoin",
    DIGITALCOIN = 0x80000012 => "Digitalcoin",
    CANNACOIN = 0x80000013 => "Cannacoin",
    DIGIBYTE = 0x80000014 => "DigiByte",
    OPEN_ASSETS = 0x80000015 => "Open Assets",
    MONACOIN = 0x80000016 => "Monacoin",
    CLAMS = 0x80000017 => "Clams",
    PRIMECOIN = 0x80000018 => "Primecoin",
    NEOSCOIN = 0x80000019 => "Neoscoin",
    JUMBUCKS = 0x8000001a => "Jumbucks",
    ZIFTRCOIN = 0x8000001b => "ziftrCOIN",
    VERTCOIN = 0x8000001c => "Vertcoin",
    NXT = 0x8000001d => "NXT",
    BURST = 0x8000001e => "Burst",
    MONETARY_UNIT = 0x8000001f => "MonetaryUnit",
    ZOOM = 0x80000020 => "Zoom",
    VPNCOIN = 0x80000021 => "Vpncoin",
    CANADA_ECOIN = 0x80000022 => "Canada eCoin",
    SHADOWCASH = 0x80000023 => "ShadowCash",
    PARKBYTE = 0x80000024 => "ParkByte",
    PANDACOIN = 0x80000025 => "Pandacoin",
    STARTCOIN = 0x80000026 => "StartCOIN",
    MOIN = 0x80000027 => "MOIN",
    ARGENTUM = 0x8000002d => "Argentum",
    GLOBAL_CURRENCY_RESERVE = 0x80000031 => "Global Currency Reserve",
    NOVACOIN = 0x80000032 => "Novacoin",
    ASIACOIN = 0x80000033 => "Asiacoin",
    BITCOINDARK = 0x80000034 => "Bitcoindark",
    DOPECOIN = 0x80000035 => "Dopecoin",
    TEMPLECOIN = 0x80000036 => "Templecoin",
    AIB = 0x80000037 => "AIB",
    EDRCOIN = 0x80000038 => "EDRCoin",
    SYSCOIN = 0x80000039 => "Syscoin",
    SOLARCOIN = 0x8000003a => "Solarcoin",
    SMILEYCOIN = 0x8000003b => "Smileycoin",
    ETHER = 0x8000003c => "Ether",
    ETHER_CLASSIC = 0x8000003d => "Ether Classic",
    OPENCHAIN = 0x80000040 => "Openchain",
    OKCASH = 0x80000045 => "OKCash",
    DOGECOIN_DARK = 0x8000004d => "DogecoinDark",
    ELECTRONIC_GULDEN = 0x8000004e => "Electronic Gulden",
    CLUBCOIN = 0x8000004f => "ClubCoin",
    RICHCOIN = 0x80000050 => "RichCoin",
    POTCOIN = 0x80000051 => "Potcoin",
    QUARKCOIN = 0x80000052 => "Quarkcoin",
    TERRACOIN = 0x80000053 => "Terracoin",
    GRIDCOIN = 0x80000054 => "Gridcoin",
    AURORACOIN = 0x80000055 => "Auroracoin",
    IXCOIN = 0x80000056 => "IXCoin",
    GULDEN = 0x80000057 => "Gulden",
    BITBEAN = 0x80000058 => "BitBean",
    BATA = 0x80000059 => "Bata",
    MYRIADCOIN = 0x8000005a => "Myriadcoin",
    BITSEND = 0x8000005b => "BitSend",
    UNOBTANIUM = 0x8000005c => "Unobtanium",
    MASTER_TRADER = 0x8000005d => "MasterTrader",
    GOLD_BLOCKS = 0x8000005e => "GoldBlocks",
    SAHAM = 0x8000005f => "Saham",
    CHRONOS = 0x80000060 => "Chronos",
    UBIQUOIN = 0x80000061 => "Ubiquoin",
    EVOTION = 0x80000062 => "Evotion",
    SAVE_THE_OCEAN = 0x80000063 => "SaveTheOcean",
    BIGUP = 0x80000064 => "BigUp",
    GAME_CREDITS = 0x80000065 => "GameCredits",
    DOLLARCOINS = 0x80000066 => "Dollarcoins",
    ZAYEDCOIN = 0x80000067 => "Zayedcoin",
    DUBAICOIN = 0x80000068 => "Dubaicoin",
    STRATIS = 0x80000069 => "Stratis",
    SHILLING = 0x8000006a => "Shilling",
    PIGGYCOIN = 0x80000076 => "PiggyCoin",
    MONERO = 0x80000080 => "Monero",
    NAVCOIN = 0x80000082 => "NavCoin",
    FACTOM_FACTOIDS = 0x80000083 => "Factom Factoids",
    FACTOM_ENTRY_CREDITS = 0x80000084 => "Factom Entry Credits",
    ZCASH = 0x80000085 => "Zcash",
    LISK = 0x80000086 => "Lisk",
    FACTOM_IDENTITY = 0x80000119 => "Factom Identity",
}

// Every entry hardened, no index published twice.
const _: () = {
    let all = CoinType::ALL;
    let mut i = 0;
    while i < all.len() {
        assert!(bip32::is_hardened(all[i].0), "coin type not hardened");
        if i > 0 {
            assert!(all[i - 1].0 < all[i].0, "coin types not strictly ascending");
        }
        i += 1;
    }
};

impl CoinType {
    /// Unregistered coin type from an already hardened index
    pub const fn custom(index: u32) -> Result<Self, Error> {
        // `unharden(index) <= MAX_COIN_TYPE` holds for every u32
        if bip32::is_hardened(index) {
            Ok(Self(index))
        } else {
            Err(Error::NotHardened(index))
        }
    }

    /// Coin type from its logical SLIP-0044 number (e.g. `60` for Ether)
    pub const fn from_coin_index(coin: u32) -> Result<Self, Error> {
        match bip32::harden(coin) {
            Some(index) => Ok(Self(index)),
            None => Err(Error::OutOfRange(coin)),
        }
    }

    /// Registered coin type with this index
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL
            .binary_search(&Self(index))
            .ok()
            .map(|pos| Self::ALL[pos])
    }

    /// Hardened index, as used in derivation
    pub const fn index(&self) -> u32 {
        self.0
    }

    /// Logical SLIP-0044 number
    pub const fn coin_index(&self) -> u32 {
        bip32::unharden(self.0)
    }

    pub fn is_registered(&self) -> bool {
        self.name().is_some()
    }

    fn from_name(name: &str) -> Option<Self> {
        let wanted: String = normalize(name);
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().map(normalize).as_deref() == Some(wanted.as_str()))
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}

impl FromStr for CoinType {
    type Err = Error;

    /// Accepts a registered name (`Bitcoin`, `factom-factoids`), a hardened hex
    /// index (`0x8000003c`), a logical index with hardening marker (`60'`, `60h`)
    /// or a plain decimal number.
    ///
    /// Plain decimals below 2^31 are logical indexes, larger ones are taken as
    /// already hardened.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s: &str = s.trim();

        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return Self::custom(u32::from_str_radix(hex, 16)?);
        }

        if let Some(coin) = s.strip_suffix('\'').or_else(|| s.strip_suffix('h')) {
            if !coin.is_empty() && coin.bytes().all(|b| b.is_ascii_digit()) {
                return Self::from_coin_index(coin.parse()?);
            }
        }

        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let index: u32 = s.parse()?;
            return Ok(Self(index | HARDENED_KEY_START));
        }

        Self::from_name(s).ok_or_else(|| Error::Unknown(s.to_string()))
    }
}

impl TryFrom<u32> for CoinType {
    type Error = Error;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::custom(index)
    }
}

impl From<CoinType> for u32 {
    fn from(coin: CoinType) -> Self {
        coin.0
    }
}
