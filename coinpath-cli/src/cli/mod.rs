// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use clap::{Parser, Subcommand};
use coinpath_core::bitcoin::Network;
use coinpath_core::types::{Account, Index};
use coinpath_core::CoinType;

pub mod io;

#[derive(Debug, Parser)]
#[command(name = "coinpath")]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Network
    #[clap(short, long, default_value_t = Network::Bitcoin)]
    pub network: Network,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Derive BIP44 keys from a BIP39 mnemonic
    Derive {
        /// Coin type: name, hardened hex (0x8000003c) or SLIP-0044 number
        #[arg(short, long, default_value_t = CoinType::BITCOIN)]
        coin: CoinType,
        /// Account number (hardened automatically)
        #[arg(short, long, default_value_t = Account::default())]
        account: Account,
        /// Use the internal (change) chain
        #[arg(long)]
        change: bool,
        /// First address index (must be between 0 and 2^31 - 1)
        #[arg(short, long, default_value_t = Index::default())]
        index: Index,
        /// Number of consecutive addresses to derive
        #[arg(long, default_value_t = 1)]
        count: u32,
        /// Don't ask for a BIP39 passphrase
        #[arg(long)]
        no_passphrase: bool,
    },
    /// List registered coin types (SLIP-0044)
    Coins {
        /// Only show coins whose name contains this text
        filter: Option<String>,
    },
    /// Check a BIP44 derivation path
    #[command(arg_required_else_help = true)]
    Path {
        /// Path (e.g. m/44'/0'/0'/0/0)
        #[arg(required = true)]
        path: String,
    },
}
