// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{transaction::Signature, Parents};
use crate::types::{
    address::Address,
    error::Error,
    output::OutputAmount,
    serialization::{
        blake2b256, encode_counted_u16, encode_counted_u8, encode_prefixed_bytes, CanonicalEncode,
    },
    tangle::{MilestoneIndex, MilestoneTimestamp},
    util::bytify,
};

/// The id of a milestone: the BLAKE2b-256 hash of the serialized milestone essence.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl MilestoneId {
    /// The number of bytes of the id.
    pub const LENGTH: usize = 32;

    /// The all-zero id, expected as the predecessor of the first milestone.
    pub fn null() -> Self {
        Self([0; Self::LENGTH])
    }

    /// Renders the id as a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        prefix_hex::encode(self.0.as_ref())
    }
}

impl fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for MilestoneId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// The funds of a single legacy address migrated by a receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigratedFundsEntry {
    /// The hash of the tail transaction on the legacy network.
    #[serde(with = "bytify")]
    pub tail_transaction_hash: [u8; Self::TAIL_TRANSACTION_HASH_LENGTH],
    /// The receiving address.
    pub address: Address,
    /// The migrated amount.
    #[serde(with = "crate::types::util::stringify")]
    pub amount: u64,
}

impl MigratedFundsEntry {
    /// The number of bytes of a legacy tail transaction hash.
    pub const TAIL_TRANSACTION_HASH_LENGTH: usize = 49;
}

impl CanonicalEncode for MigratedFundsEntry {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.tail_transaction_hash.encode_into(bytes);
        self.address.encode_into(bytes);
        self.amount.encode_into(bytes);
    }
}

/// The payload that moves the migrated funds of a receipt out of the treasury.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryTransactionPayload {
    /// The id of the milestone that created the consumed treasury output.
    pub input_milestone_id: MilestoneId,
    /// The amount of the created treasury output.
    pub output_amount: OutputAmount,
}

impl TreasuryTransactionPayload {
    /// The kind byte of the payload.
    pub const KIND: u8 = 4;
}

impl CanonicalEncode for TreasuryTransactionPayload {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        Self::KIND.encode_into(bytes);
        self.input_milestone_id.0.encode_into(bytes);
        self.output_amount.encode_into(bytes);
    }
}

/// The different options a milestone can carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MilestoneOption {
    /// A receipt migrating funds from a legacy network into the ledger.
    Receipt {
        /// The legacy milestone index at which the funds were migrated.
        migrated_at: MilestoneIndex,
        /// Whether this is the final receipt for `migrated_at`.
        last: bool,
        /// The migrated funds.
        funds: Box<[MigratedFundsEntry]>,
        /// The treasury transaction paying out of the treasury.
        transaction: TreasuryTransactionPayload,
    },
    /// A pending protocol parameter change; carried opaquely.
    Parameters {
        /// The index at which the new parameters take effect.
        target_milestone_index: MilestoneIndex,
        /// The new protocol version.
        protocol_version: u8,
        /// The serialized parameters.
        #[serde(with = "serde_bytes")]
        binary_parameters: Vec<u8>,
    },
}

impl MilestoneOption {
    const KIND_RECEIPT: u8 = 0;
    const KIND_PARAMETERS: u8 = 1;
}

impl CanonicalEncode for MilestoneOption {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        match self {
            Self::Receipt {
                migrated_at,
                last,
                funds,
                transaction,
            } => {
                Self::KIND_RECEIPT.encode_into(bytes);
                migrated_at.encode_into(bytes);
                last.encode_into(bytes);
                encode_counted_u16(funds, bytes);
                transaction.encode_into(bytes);
            }
            Self::Parameters {
                target_milestone_index,
                protocol_version,
                binary_parameters,
            } => {
                Self::KIND_PARAMETERS.encode_into(bytes);
                target_milestone_index.encode_into(bytes);
                protocol_version.encode_into(bytes);
                encode_prefixed_bytes(binary_parameters, bytes);
            }
        }
    }
}

/// The signed part of a milestone payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneEssence {
    /// The index of the milestone.
    pub index: MilestoneIndex,
    /// The Unix timestamp of the milestone.
    pub timestamp: MilestoneTimestamp,
    /// The protocol version the milestone was issued under.
    pub protocol_version: u8,
    /// The id of the preceding milestone; all-zero for the first milestone.
    pub previous_milestone_id: MilestoneId,
    /// The parents whose past cone the milestone confirms.
    pub parents: Parents,
    /// The Merkle root over all messages referenced by the milestone.
    #[serde(with = "bytify")]
    pub confirmed_merkle_root: [u8; Self::MERKLE_ROOT_LENGTH],
    /// The Merkle root over the messages whose mutations are applied to the ledger.
    #[serde(with = "bytify")]
    pub applied_merkle_root: [u8; Self::MERKLE_ROOT_LENGTH],
    /// Opaque metadata chosen by the coordinator.
    #[serde(with = "serde_bytes")]
    pub metadata: Vec<u8>,
    /// The options carried by the milestone.
    pub options: Box<[MilestoneOption]>,
}

impl MilestoneEssence {
    /// The number of bytes of a Merkle root.
    pub const MERKLE_ROOT_LENGTH: usize = 32;
}

impl CanonicalEncode for MilestoneEssence {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.index.encode_into(bytes);
        self.timestamp.encode_into(bytes);
        self.protocol_version.encode_into(bytes);
        self.previous_milestone_id.0.encode_into(bytes);
        self.parents.encode_into(bytes);
        self.confirmed_merkle_root.encode_into(bytes);
        self.applied_merkle_root.encode_into(bytes);
        encode_prefixed_bytes(&self.metadata, bytes);
        encode_counted_u8(&self.options, bytes);
    }
}

/// A milestone payload: the signed essence plus the coordinator signatures.
///
/// Signature verification against the configured public key ranges happens before the
/// milestone reaches the confirmation core; a payload handed to [`confirm`] is authentic.
///
/// [`confirm`]: crate::whiteflag::ConfirmationEngine::confirm
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestonePayload {
    /// The signed essence.
    pub essence: MilestoneEssence,
    /// The coordinator signatures over the essence hash.
    pub signatures: Box<[Signature]>,
}

impl MilestonePayload {
    /// Computes the content-addressed id of the milestone.
    pub fn id(&self) -> MilestoneId {
        MilestoneId(blake2b256(&self.essence.to_canonical_bytes()))
    }

    /// Returns the receipt option, if the milestone carries one.
    pub fn receipt(&self) -> Option<&MilestoneOption> {
        self.essence
            .options
            .iter()
            .find(|option| matches!(option, MilestoneOption::Receipt { .. }))
    }
}

impl CanonicalEncode for MilestonePayload {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.essence.encode_into(bytes);
        encode_counted_u8(&self.signatures, bytes);
    }
}

#[cfg(feature = "rand")]
mod rand {
    use super::*;

    impl MilestoneId {
        /// Generates a random [`MilestoneId`].
        pub fn rand() -> Self {
            Self(::rand::random())
        }
    }
}
