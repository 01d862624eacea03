// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use coinpath_core::bips::bip32::{Bip32, ExtendedPrivKey};
use coinpath_core::bips::bip44::{EXTERNAL_BRANCH, INTERNAL_BRANCH};
use coinpath_core::bitcoin::Network;
use coinpath_core::{Bip44Path, CoinType, Seed};

mod cli;
mod util;

use self::cli::{io, Cli, Command};
use self::util::Print;

fn main() -> Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let network: Network = args.network;

    match args.command {
        Command::Derive {
            coin,
            account,
            change,
            index,
            count,
            no_passphrase,
        } => {
            let chain: u32 = if change {
                INTERNAL_BRANCH
            } else {
                EXTERNAL_BRANCH
            };
            let mut path = Bip44Path::new(coin, account.to_hardened(), chain, index.as_u32())?;

            let mnemonic: String = io::get_input("Mnemonic (BIP39)")?;
            let passphrase: String = if no_passphrase {
                String::new()
            } else {
                io::get_passphrase()?
            };

            let seed = Seed::parse(mnemonic, Some(passphrase.as_str()))?;
            let master: ExtendedPrivKey = seed.to_bip32_root_key(network)?;

            let mut keys: Vec<(Bip44Path, ExtendedPrivKey)> = Vec::new();
            for _ in 0..count {
                keys.push((path, path.derive(&master)?));
                match path.next_address() {
                    Some(next) => path = next,
                    None => {
                        log::warn!("Reached the last address of the chain");
                        break;
                    }
                }
            }

            keys.print();
            Ok(())
        }
        Command::Coins { filter } => {
            let filter: Option<String> = filter.map(|f| f.to_lowercase());
            let coins: Vec<CoinType> = CoinType::ALL
                .iter()
                .copied()
                .filter(|coin| match (&filter, coin.name()) {
                    (Some(filter), Some(name)) => name.to_lowercase().contains(filter.as_str()),
                    _ => true,
                })
                .collect();
            coins.print();
            Ok(())
        }
        Command::Path { path } => {
            let path = Bip44Path::from_str(&path)?;
            println!("Coin: {}", path.coin());
            path.print();
            Ok(())
        }
    }
}
