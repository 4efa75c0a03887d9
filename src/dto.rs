// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the wire representations served to external surfaces.

use serde::{Deserialize, Serialize};

use crate::{
    types::{
        ledger::{LedgerOutput, LedgerSpent},
        message::{transaction::TransactionId, MessageId, MilestoneId},
        output::Output,
        tangle::{MilestoneIndex, MilestoneTimestamp},
    },
    utxo::TreasuryRecord,
};

/// An output together with the metadata a client needs to spend or display it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputResponse {
    /// The id of the message that booked the output.
    pub message_id: MessageId,
    /// The id of the creating transaction.
    pub transaction_id: TransactionId,
    /// The position within the creating transaction.
    pub output_index: u16,
    /// Whether the output has been consumed.
    pub is_spent: bool,
    /// The index of the milestone that booked the output.
    pub milestone_index_booked: MilestoneIndex,
    /// The timestamp of the milestone that booked the output.
    pub milestone_timestamp_booked: MilestoneTimestamp,
    /// The ledger index the response was produced at.
    pub ledger_index: MilestoneIndex,
    /// The output itself.
    pub output: Output,
}

impl OutputResponse {
    /// Builds the response for an unspent output.
    pub fn unspent(output: &LedgerOutput, ledger_index: MilestoneIndex) -> Self {
        Self {
            message_id: output.message_id,
            transaction_id: output.output_id.transaction_id,
            output_index: output.output_id.index,
            is_spent: false,
            milestone_index_booked: output.booked.milestone_index,
            milestone_timestamp_booked: output.booked.milestone_timestamp,
            ledger_index,
            output: output.output.clone(),
        }
    }

    /// Builds the response for a spent output.
    pub fn spent(spent: &LedgerSpent, ledger_index: MilestoneIndex) -> Self {
        Self {
            is_spent: true,
            ..Self::unspent(&spent.output, ledger_index)
        }
    }
}

/// The current treasury, as served to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryResponse {
    /// The id of the milestone that created the treasury.
    pub milestone_id: MilestoneId,
    /// The amount held by the treasury.
    #[serde(with = "crate::types::util::stringify")]
    pub amount: u64,
}

impl From<&TreasuryRecord> for TreasuryResponse {
    fn from(treasury: &TreasuryRecord) -> Self {
        Self {
            milestone_id: treasury.milestone_id,
            amount: treasury.amount,
        }
    }
}
