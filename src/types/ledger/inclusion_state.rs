// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// A message's position in the ledger once it has been referenced by a milestone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerInclusionState {
    /// The message carries a transaction that mutated the ledger.
    Included,
    /// The message carries a transaction that conflicts with the ledger.
    Conflicting,
    /// The message carries no transaction.
    NoTransaction,
}
