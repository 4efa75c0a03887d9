// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::types::{message::MilestoneId, output::OutputId, tangle::MilestoneIndex};

/// Errors raised while mutating the ledger. All of them indicate a divergence from network
/// truth and are fatal to the confirmation that caused them.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The applied milestone index does not directly follow the ledger index.
    #[error("ledger index gap: expected {expected}, tried to apply {actual}")]
    LedgerIndexGap {
        /// The only index the ledger accepts next.
        expected: MilestoneIndex,
        /// The index that was applied.
        actual: MilestoneIndex,
    },
    /// A consumed output is not part of the unspent set.
    #[error("output {0} is not unspent")]
    DoubleSpend(OutputId),
    /// A created output already exists.
    #[error("output {0} already exists in the ledger")]
    DuplicateCreate(OutputId),
    /// The consumed treasury does not match the current treasury.
    #[error("treasury mismatch: current treasury was created by {expected}, mutation consumes {found}")]
    TreasuryMismatch {
        /// The id of the milestone that created the current treasury.
        expected: MilestoneId,
        /// The id the mutation claims to consume.
        found: MilestoneId,
    },
    /// The ledger has no treasury to consume.
    #[error("no treasury output has been booked")]
    MissingTreasury,
    /// The backing journal failed.
    #[error("ledger backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}
