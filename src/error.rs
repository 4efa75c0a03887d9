// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the error of the confirmation operation.

use thiserror::Error;

use crate::{
    types::message::{MessageId, MilestoneId},
    utxo::{LedgerError, ReceiptError},
    whiteflag::WhiteFlagError,
};

/// Everything that can fail a confirmation.
///
/// None of these are produced by a well-behaved network; a node hitting one of them cannot
/// advance its ledger and must be halted for operator intervention. Per-message classification
/// conflicts are not errors: they are recorded in the mutations and the confirmation proceeds.
#[derive(Error, Debug)]
pub enum ConfirmationError {
    /// The milestone message is not present in the store.
    #[error("milestone message {0} not found")]
    MissingMilestoneMessage(MessageId),
    /// A message needed for the metadata pass is not present in the store.
    #[error("referenced message {0} not found")]
    MissingReferencedMessage(MessageId),
    /// The message does not carry a milestone payload.
    #[error("message {0} does not carry a milestone payload")]
    NotAMilestone(MessageId),
    /// Milestone indexes start at one.
    #[error("invalid milestone index 0")]
    InvalidMilestoneIndex,
    /// The milestone does not chain onto the last applied milestone.
    #[error("previous milestone id mismatch: ledger is at {expected}, milestone names {found}")]
    InvalidPreviousMilestoneId {
        /// The id of the last applied milestone.
        expected: MilestoneId,
        /// The id the milestone claims to follow.
        found: MilestoneId,
    },
    /// The computed confirmed Merkle root differs from the value in the milestone.
    #[error("computed confirmed merkle root {computed} does not match the milestone value {expected}")]
    ConfirmedMerkleRootMismatch {
        /// The locally computed root.
        computed: String,
        /// The root carried by the milestone.
        expected: String,
    },
    /// The computed applied Merkle root differs from the value in the milestone.
    #[error("computed applied merkle root {computed} does not match the milestone value {expected}")]
    AppliedMerkleRootMismatch {
        /// The locally computed root.
        computed: String,
        /// The root carried by the milestone.
        expected: String,
    },
    /// The white-flag computation aborted.
    #[error(transparent)]
    WhiteFlag(#[from] WhiteFlagError),
    /// The milestone carries an invalid receipt.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
    /// Applying the mutations to the ledger failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// The underlying storage failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}
