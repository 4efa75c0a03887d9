// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the lifecycle events emitted by the confirmation core.
//!
//! The callbacks are synchronous and their order is part of the contract: `on_receipt` fires
//! while the receipt is processed, `on_referenced_message` fires once per referenced message
//! during the metadata pass, then `on_milestone_confirmed`, `on_ledger_updated` and, when a
//! receipt was applied, `on_treasury_mutated`.

use crate::{
    types::{
        ledger::{LedgerOutput, LedgerSpent, MessageMetadata},
        tangle::{MilestoneIndex, MilestoneTimestamp},
    },
    utxo::{ReceiptRecord, TreasuryMutation},
    whiteflag::Confirmation,
};

/// The sink for confirmation lifecycle events. All methods default to no-ops.
#[allow(unused_variables)]
pub trait ConfirmationEvents: Send + Sync {
    /// A receipt is about to be applied. Returning an error vetoes the receipt and fails the
    /// confirmation.
    fn on_receipt(&self, receipt: &ReceiptRecord) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }

    /// A message was referenced by the milestone.
    fn on_referenced_message(
        &self,
        metadata: &MessageMetadata,
        index: MilestoneIndex,
        timestamp: MilestoneTimestamp,
    ) {
    }

    /// The milestone was confirmed and its mutations applied.
    fn on_milestone_confirmed(&self, confirmation: &Confirmation) {}

    /// The ledger advanced to `index` with the given created and consumed outputs.
    fn on_ledger_updated(&self, index: MilestoneIndex, created: &[LedgerOutput], consumed: &[LedgerSpent]) {}

    /// The treasury was replaced while applying `index`.
    fn on_treasury_mutated(&self, index: MilestoneIndex, mutation: &TreasuryMutation) {}
}

/// An event sink that discards every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullEvents;

impl ConfirmationEvents for NullEvents {}
