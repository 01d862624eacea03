// Copyright (c) 2022-2023 Yuki Kishimoto
// Distributed under the MIT software license

//! SatoshiLabs Improvement Proposals
//!
//! <https://github.com/satoshilabs/slips>

pub mod slip44;
