// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use std::fmt;
use std::str::FromStr;

pub mod seed;

pub use self::seed::Seed;
use crate::bips::bip32::{self, HARDENED_KEY_START};
use crate::bips::bip44::{DEFAULT_ACCOUNT_INDEX, MAX_ACCOUNT_NUM, MAX_ADDRESSES_PER_ACCOUNT};

#[derive(Debug, thiserror::Error)]
pub enum ErrorIndex {
    #[error("Invalid index")]
    InvalidIndex,
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),
}

/// Logical account number, in `[0, MAX_ACCOUNT_NUM]`
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Account(u32);

impl Account {
    pub fn new(account: u32) -> Result<Self, ErrorIndex> {
        if account <= MAX_ACCOUNT_NUM {
            Ok(Self(account))
        } else {
            Err(ErrorIndex::InvalidIndex)
        }
    }

    /// Account from its hardened index (e.g. [`DEFAULT_ACCOUNT_INDEX`])
    pub fn from_hardened(index: u32) -> Result<Self, ErrorIndex> {
        if bip32::is_hardened(index) {
            Self::new(bip32::unharden(index))
        } else {
            Err(ErrorIndex::InvalidIndex)
        }
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Index used as `account'` in derivation
    pub fn to_hardened(&self) -> u32 {
        self.0 | HARDENED_KEY_START
    }

    pub fn is_default(&self) -> bool {
        self.to_hardened() == DEFAULT_ACCOUNT_INDEX
    }
}

impl FromStr for Account {
    type Err = ErrorIndex;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s: &str = s.trim_end_matches(&['\'', 'h'][..]);
        let account: u32 = s.parse()?;
        Self::new(account)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'", self.as_u32())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Address index, in `[0, MAX_ADDRESSES_PER_ACCOUNT]`
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index(u32);

impl Index {
    pub fn new(index: u32) -> Result<Self, ErrorIndex> {
        if index <= MAX_ADDRESSES_PER_ACCOUNT {
            Ok(Self(index))
        } else {
            Err(ErrorIndex::InvalidIndex)
        }
    }

    /// Move to the next index. Returns `false`, leaving the index untouched,
    /// when the last address is already reached.
    pub fn increment(&mut self) -> bool {
        if self.0 >= MAX_ADDRESSES_PER_ACCOUNT {
            false
        } else {
            self.0 += 1;
            true
        }
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl FromStr for Index {
    type Err = ErrorIndex;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let index: u32 = s.parse()?;
        Self::new(index)
    }
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}
