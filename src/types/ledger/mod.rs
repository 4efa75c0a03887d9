// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the ledger types.

mod conflict_reason;
mod inclusion_state;
mod metadata;
mod output_metadata;

pub use self::{
    conflict_reason::ConflictReason,
    inclusion_state::LedgerInclusionState,
    metadata::{ConeRootIndexes, MessageMetadata},
    output_metadata::{LedgerOutput, LedgerSpent, RentStructureBytes, SpentMetadata},
};
