// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use super::OutputAmount;
use crate::types::serialization::CanonicalEncode;

/// The singleton output that holds the migration treasury.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryOutput {
    /// The amount of base tokens held by the treasury.
    pub amount: OutputAmount,
}

impl CanonicalEncode for TreasuryOutput {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.amount.encode_into(bytes);
    }
}
