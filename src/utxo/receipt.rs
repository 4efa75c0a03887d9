// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Receipt validation and conversion into migrated ledger outputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::diff::TreasuryRecord;
use crate::types::{
    ledger::LedgerOutput,
    message::{
        milestone::{MigratedFundsEntry, TreasuryTransactionPayload},
        transaction::TransactionId,
        MessageId, MilestoneId,
    },
    output::{BasicOutput, Output, OutputId},
    tangle::{MilestoneIndex, MilestoneIndexTimestamp},
};

/// The largest number of funds a single receipt can migrate.
pub const MAX_MIGRATED_FUNDS_COUNT: usize = 127;

/// A receipt carried by a milestone, recorded alongside the milestone it arrived in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// The index of the milestone that carried the receipt.
    pub at: MilestoneIndex,
    /// The legacy milestone index at which the funds were migrated.
    pub migrated_at: MilestoneIndex,
    /// Whether this is the final receipt for `migrated_at`.
    pub last: bool,
    /// The migrated funds.
    pub funds: Vec<MigratedFundsEntry>,
    /// The treasury transaction paying the funds out of the treasury.
    pub transaction: TreasuryTransactionPayload,
}

/// Errors raised while validating a receipt. All of them are fatal to the confirmation.
#[derive(Error, Debug)]
pub enum ReceiptError {
    /// The receipt migrates no funds.
    #[error("receipt contains no migrated funds")]
    NoFunds,
    /// The receipt migrates more funds than allowed.
    #[error("receipt contains {0} migrated funds, the maximum is {MAX_MIGRATED_FUNDS_COUNT}")]
    TooManyFunds(usize),
    /// The same legacy tail transaction appears twice.
    #[error("receipt migrates the same tail transaction twice")]
    DuplicateTailTransactionHash,
    /// The funds plus the new treasury do not add up to the consumed treasury.
    #[error("receipt sums mismatch: {funds} migrated + {created} new treasury != {consumed} consumed treasury")]
    SumMismatch {
        /// The total of the migrated funds.
        funds: u64,
        /// The amount of the created treasury output.
        created: u64,
        /// The amount of the consumed treasury output.
        consumed: u64,
    },
    /// The treasury transaction does not consume the current treasury.
    #[error("receipt treasury input {found} does not match the current treasury {expected}")]
    TreasuryLinkage {
        /// The id of the milestone that created the current treasury.
        expected: MilestoneId,
        /// The input milestone id named by the receipt.
        found: MilestoneId,
    },
    /// A receipt event subscriber rejected the receipt.
    #[error("receipt rejected: {0}")]
    Rejected(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Validates the structural rules of a receipt against the current treasury.
pub fn validate_receipt(receipt: &ReceiptRecord, treasury: &TreasuryRecord) -> Result<(), ReceiptError> {
    if receipt.funds.is_empty() {
        return Err(ReceiptError::NoFunds);
    }
    if receipt.funds.len() > MAX_MIGRATED_FUNDS_COUNT {
        return Err(ReceiptError::TooManyFunds(receipt.funds.len()));
    }

    let mut tail_hashes = receipt
        .funds
        .iter()
        .map(|entry| entry.tail_transaction_hash)
        .collect::<Vec<_>>();
    tail_hashes.sort_unstable();
    tail_hashes.dedup();
    if tail_hashes.len() != receipt.funds.len() {
        return Err(ReceiptError::DuplicateTailTransactionHash);
    }

    if receipt.transaction.input_milestone_id != treasury.milestone_id {
        return Err(ReceiptError::TreasuryLinkage {
            expected: treasury.milestone_id,
            found: receipt.transaction.input_milestone_id,
        });
    }

    let migrated = receipt.funds.iter().map(|entry| entry.amount).sum::<u64>();
    let created = receipt.transaction.output_amount.0;
    if migrated.checked_add(created) != Some(treasury.amount) {
        return Err(ReceiptError::SumMismatch {
            funds: migrated,
            created,
            consumed: treasury.amount,
        });
    }

    Ok(())
}

/// Converts the funds of a receipt into bookable ledger outputs.
///
/// The outputs are addressed by the id of the carrying milestone, with the fund position as
/// the output index.
pub fn receipt_to_outputs(
    receipt: &ReceiptRecord,
    message_id: MessageId,
    milestone_id: MilestoneId,
    booked: MilestoneIndexTimestamp,
) -> Vec<LedgerOutput> {
    receipt
        .funds
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            LedgerOutput::new(
                OutputId {
                    transaction_id: TransactionId(milestone_id.0),
                    index: index as u16,
                },
                message_id,
                booked,
                Output::Basic(BasicOutput::simple(entry.amount, entry.address)),
            )
        })
        .collect()
}
