// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use coinpath_core::bips::bip32::{self, ExtendedPrivKey, ExtendedPubKey};
use coinpath_core::{Bip44Path, CoinType, SECP256K1};
use prettytable::{row, Table};

pub trait Print {
    fn print(&self);
}

impl Print for [(Bip44Path, ExtendedPrivKey)] {
    fn print(&self) {
        let mut table = Table::new();

        table.set_titles(row!["Path", "Extended private key", "Secret", "Public key"]);

        for (path, key) in self.iter() {
            let pubkey = ExtendedPubKey::from_priv(&SECP256K1, key);
            table.add_row(row![
                path,
                key,
                key.private_key.display_secret(),
                pubkey.public_key
            ]);
        }

        table.printstd();
    }
}

impl Print for [CoinType] {
    fn print(&self) {
        let mut table = Table::new();

        table.set_titles(row!["Coin", "Index", "Hardened"]);

        for coin in self.iter() {
            table.add_row(row![
                coin,
                coin.coin_index(),
                format!("{:#010x}", coin.index())
            ]);
        }

        table.printstd();
    }
}

impl Print for Bip44Path {
    fn print(&self) {
        let mut table = Table::new();

        table.set_titles(row!["Level", "Index", "Child"]);

        for (level, index) in self.indices() {
            let child = if bip32::is_hardened(index) {
                format!("{}'", bip32::unharden(index))
            } else {
                index.to_string()
            };
            table.add_row(row![level, format!("{index:#010x}"), child]);
        }

        table.printstd();
    }
}
