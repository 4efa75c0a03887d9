// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! The white-flag confirmation core of a Tangle node.
//!
//! A milestone names a set of parent messages; this crate walks the past cone
//! of those parents in a deterministic post-order, classifies every message,
//! computes the ledger mutations together with the two Merkle roots that the
//! milestone signs over, and applies the mutations atomically to the UTXO
//! ledger.

pub mod config;
pub mod dto;
pub mod error;
pub mod events;
pub mod metrics;
pub mod store;
pub mod traversal;
pub mod types;
pub mod utxo;
pub mod whiteflag;

pub use self::{
    config::ProtocolConfig,
    error::ConfirmationError,
    whiteflag::{ConfirmationEngine, WhiteFlagMutations},
};
