// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use super::receipt::ReceiptRecord;
use crate::types::{
    ledger::{LedgerOutput, LedgerSpent},
    message::MilestoneId,
    tangle::MilestoneIndex,
};

/// The booked treasury output: the migration funds together with the milestone that created
/// them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryRecord {
    /// The id of the milestone that created this treasury output.
    pub milestone_id: MilestoneId,
    /// The amount of base tokens held by the treasury.
    #[serde(with = "crate::types::util::stringify")]
    pub amount: u64,
}

/// The replacement of the treasury output by a milestone carrying a receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryMutation {
    /// The newly created treasury.
    pub created: TreasuryRecord,
    /// The treasury consumed by the mutation.
    pub consumed: TreasuryRecord,
}

/// Everything one milestone changed in the ledger, grouped under the milestone index so that
/// recovery is all-or-nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneDiff {
    /// The index of the applied milestone.
    pub index: MilestoneIndex,
    /// The id of the applied milestone.
    pub milestone_id: MilestoneId,
    /// The outputs created by the milestone, including migrated receipt funds.
    pub created_outputs: Vec<LedgerOutput>,
    /// The outputs consumed by the milestone.
    pub consumed_outputs: Vec<LedgerSpent>,
    /// The treasury mutation, if the milestone carried a receipt.
    pub treasury: Option<TreasuryMutation>,
    /// The receipt, if the milestone carried one.
    pub receipt: Option<ReceiptRecord>,
}

impl MilestoneDiff {
    /// The total amount created by this diff, including a created treasury.
    pub fn created_amount(&self) -> u128 {
        self.created_outputs
            .iter()
            .map(|output| output.amount().0 as u128)
            .sum::<u128>()
            + self.treasury.as_ref().map_or(0, |t| t.created.amount as u128)
    }

    /// The total amount consumed by this diff, including a consumed treasury.
    pub fn consumed_amount(&self) -> u128 {
        self.consumed_outputs
            .iter()
            .map(|spent| spent.amount().0 as u128)
            .sum::<u128>()
            + self.treasury.as_ref().map_or(0, |t| t.consumed.amount as u128)
    }
}
