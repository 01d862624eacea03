// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

use anyhow::Result;
use dialoguer::{Input, Password};

pub fn get_input<S>(prompt: S) -> Result<String>
where
    S: Into<String>,
{
    Ok(Input::new().with_prompt(prompt).interact_text()?)
}

pub fn get_passphrase() -> Result<String> {
    Ok(Password::new()
        .with_prompt("Passphrase (BIP39)")
        .allow_empty_password(true)
        .interact()?)
}
