// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the white-flag confirmation: deterministic cone classification, the
//! Merkle roots binding it to the milestone, and the engine that applies the outcome.

mod confirmation;
mod merkle;
mod mutations;
mod semantic;

pub use self::{
    confirmation::{
        Confirmation, ConfirmationEngine, ConfirmationMetrics, ConfirmedMilestone, ConfirmedMilestoneStats,
    },
    merkle::MerkleHasher,
    mutations::{WhiteFlagError, WhiteFlagMutations},
    semantic::validate_transaction,
};

pub(crate) use self::mutations::compute_white_flag_mutations;
