// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{MilestoneId, TaggedDataPayload};
use crate::types::{
    error::Error,
    output::{Output, OutputId},
    serialization::{blake2b256, encode_counted_u16, encode_prefixed_bytes, CanonicalEncode},
    util::bytify,
};

/// The id of a transaction: the BLAKE2b-256 hash of the serialized transaction payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl TransactionId {
    /// The number of bytes of the id.
    pub const LENGTH: usize = 32;

    /// Renders the id as a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        prefix_hex::encode(self.0.as_ref())
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for TransactionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// The inputs consumed by a transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Input {
    /// Consumes an unspent transaction output.
    Utxo {
        /// The id of the consumed output.
        output_id: OutputId,
    },
    /// Consumes the treasury; only valid inside a receipt's treasury transaction.
    Treasury {
        /// The id of the milestone that created the current treasury.
        milestone_id: MilestoneId,
    },
}

impl Input {
    const KIND_UTXO: u8 = 0;
    const KIND_TREASURY: u8 = 1;
}

impl CanonicalEncode for Input {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        match self {
            Self::Utxo { output_id } => {
                Self::KIND_UTXO.encode_into(bytes);
                output_id.encode_into(bytes);
            }
            Self::Treasury { milestone_id } => {
                Self::KIND_TREASURY.encode_into(bytes);
                milestone_id.0.encode_into(bytes);
            }
        }
    }
}

/// A cryptographic signature together with the signing public key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Signature {
    /// An Ed25519 signature.
    Ed25519 {
        /// The public key of the signing keypair.
        #[serde(with = "bytify")]
        public_key: [u8; 32],
        /// The signature bytes.
        #[serde(with = "bytify")]
        signature: [u8; 64],
    },
}

impl Signature {
    const KIND_ED25519: u8 = 0;
}

impl CanonicalEncode for Signature {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        match self {
            Self::Ed25519 { public_key, signature } => {
                Self::KIND_ED25519.encode_into(bytes);
                public_key.encode_into(bytes);
                signature.encode_into(bytes);
            }
        }
    }
}

/// The different unlocks authorizing the consumption of an input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Unlock {
    /// Unlocks the input at the same position with a signature.
    Signature {
        /// The signature over the essence hash.
        signature: Signature,
    },
    /// Refers to a previous signature unlock of the same address.
    Reference {
        /// The position of the referenced unlock.
        index: u16,
    },
    /// Unlocks an input owned by the alias unlocked at the referenced position.
    Alias {
        /// The position of the unlocked alias input.
        index: u16,
    },
    /// Unlocks an input owned by the NFT unlocked at the referenced position.
    Nft {
        /// The position of the unlocked NFT input.
        index: u16,
    },
}

impl Unlock {
    const KIND_SIGNATURE: u8 = 0;
    const KIND_REFERENCE: u8 = 1;
    const KIND_ALIAS: u8 = 2;
    const KIND_NFT: u8 = 3;
}

impl CanonicalEncode for Unlock {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        match self {
            Self::Signature { signature } => {
                Self::KIND_SIGNATURE.encode_into(bytes);
                signature.encode_into(bytes);
            }
            Self::Reference { index } => {
                Self::KIND_REFERENCE.encode_into(bytes);
                index.encode_into(bytes);
            }
            Self::Alias { index } => {
                Self::KIND_ALIAS.encode_into(bytes);
                index.encode_into(bytes);
            }
            Self::Nft { index } => {
                Self::KIND_NFT.encode_into(bytes);
                index.encode_into(bytes);
            }
        }
    }
}

/// The signed part of a transaction payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TransactionEssence {
    /// The regular transaction essence.
    #[serde(rename = "regular")]
    Regular {
        /// The id of the network the transaction was issued for. Signing over it invalidates
        /// the transaction on every other network.
        #[serde(with = "crate::types::util::stringify")]
        network_id: u64,
        /// The consumed inputs.
        inputs: Box<[Input]>,
        /// A commitment to the outputs consumed by the inputs.
        #[serde(with = "bytify")]
        inputs_commitment: [u8; Self::INPUTS_COMMITMENT_LENGTH],
        /// The created outputs.
        outputs: Box<[Output]>,
        /// An optional tagged data payload.
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<TaggedDataPayload>,
    },
}

impl TransactionEssence {
    /// The number of bytes of the inputs commitment.
    pub const INPUTS_COMMITMENT_LENGTH: usize = 32;

    /// Computes the commitment to a list of consumed outputs: the BLAKE2b-256 hash over the
    /// hashes of the serialized outputs, in input order.
    pub fn inputs_commitment<'a>(consumed: impl Iterator<Item = &'a Output>) -> [u8; Self::INPUTS_COMMITMENT_LENGTH] {
        let mut concatenated = Vec::new();
        for output in consumed {
            concatenated.extend_from_slice(&blake2b256(&output.to_canonical_bytes()));
        }
        blake2b256(&concatenated)
    }

    /// Computes the hash that unlock signatures sign over.
    pub fn hash(&self) -> [u8; 32] {
        blake2b256(&self.to_canonical_bytes())
    }
}

impl CanonicalEncode for TransactionEssence {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        match self {
            Self::Regular {
                network_id,
                inputs,
                inputs_commitment,
                outputs,
                payload,
            } => {
                1u8.encode_into(bytes);
                network_id.encode_into(bytes);
                encode_counted_u16(inputs, bytes);
                inputs_commitment.encode_into(bytes);
                encode_counted_u16(outputs, bytes);
                match payload {
                    None => encode_prefixed_bytes(&[], bytes),
                    Some(payload) => encode_prefixed_bytes(&payload.to_canonical_bytes(), bytes),
                }
            }
        }
    }
}

/// A transaction payload: the signed essence plus the unlocks authorizing it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// The signed essence.
    pub essence: TransactionEssence,
    /// One unlock per input, in input order.
    pub unlocks: Box<[Unlock]>,
}

impl TransactionPayload {
    /// Computes the content-addressed id of the transaction.
    pub fn id(&self) -> TransactionId {
        TransactionId(blake2b256(&self.to_canonical_bytes()))
    }

    /// Returns the consumed inputs.
    pub fn inputs(&self) -> &[Input] {
        match &self.essence {
            TransactionEssence::Regular { inputs, .. } => inputs,
        }
    }

    /// Returns the created outputs.
    pub fn outputs(&self) -> &[Output] {
        match &self.essence {
            TransactionEssence::Regular { outputs, .. } => outputs,
        }
    }
}

impl CanonicalEncode for TransactionPayload {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.essence.encode_into(bytes);
        encode_counted_u16(&self.unlocks, bytes);
    }
}

#[cfg(feature = "rand")]
mod rand {
    use super::*;

    impl TransactionId {
        /// Generates a random [`TransactionId`].
        pub fn rand() -> Self {
            Self(::rand::random())
        }
    }
}
