// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the protocol types.

pub mod address;
pub mod error;
pub mod ledger;
pub mod message;
pub mod output;
pub mod tangle;
pub mod util;

pub(crate) mod serialization;
