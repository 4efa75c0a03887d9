// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::types::{
    message::{transaction::TransactionId, MessageId},
    output::{Output, OutputAmount, OutputId},
    serialization::CanonicalEncode,
    tangle::MilestoneIndexTimestamp,
};

/// When and by which transaction an output was consumed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpentMetadata {
    pub transaction_id: TransactionId,
    pub spent: MilestoneIndexTimestamp,
}

/// An output as booked in the ledger.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LedgerOutput {
    pub output_id: OutputId,
    pub message_id: MessageId,
    pub booked: MilestoneIndexTimestamp,
    pub output: Output,
    pub rent_structure: RentStructureBytes,
}

impl LedgerOutput {
    /// Creates the booked form of `output`, deriving the rent bytes from its serialization.
    pub fn new(
        output_id: OutputId,
        message_id: MessageId,
        booked: MilestoneIndexTimestamp,
        output: Output,
    ) -> Self {
        Self {
            rent_structure: RentStructureBytes::compute(&output),
            output_id,
            message_id,
            booked,
            output,
        }
    }

    pub fn amount(&self) -> OutputAmount {
        self.output.amount()
    }
}

/// A consumed output together with the metadata of its consumption.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LedgerSpent {
    pub output: LedgerOutput,
    pub spent_metadata: SpentMetadata,
}

impl LedgerSpent {
    pub fn amount(&self) -> OutputAmount {
        self.output.amount()
    }
}

/// The different numbers of bytes that are used for computing the storage cost of an output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentStructureBytes {
    /// The number of key bytes in an output.
    pub num_key_bytes: u64,
    /// The number of data bytes in an output.
    pub num_data_bytes: u64,
}

impl RentStructureBytes {
    // The key overhead of a booked output: output id, message id, booked index and timestamp.
    const KEY_OFFSET: u64 = (OutputId::LENGTH + MessageId::LENGTH + 2 * std::mem::size_of::<u32>()) as u64;

    /// Derives the rent bytes of an output from its canonical serialization.
    pub fn compute(output: &Output) -> Self {
        RentStructureBytes {
            num_key_bytes: Self::KEY_OFFSET,
            num_data_bytes: output.to_canonical_bytes().len() as u64,
        }
    }

    /// Computes the storage cost of the output under the given rent parameters.
    pub fn rent_cost(&self, config: &crate::config::RentStructure) -> u64 {
        (self.num_data_bytes * config.v_byte_factor_data as u64 + self.num_key_bytes * config.v_byte_factor_key as u64)
            * config.v_byte_cost as u64
    }
}
