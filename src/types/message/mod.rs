// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the message types.

pub mod milestone;
pub mod tagged_data;
pub mod transaction;

use std::{fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};

pub use self::{
    milestone::{MilestoneEssence, MilestoneId, MilestoneOption, MilestonePayload},
    tagged_data::TaggedDataPayload,
    transaction::{TransactionEssence, TransactionId, TransactionPayload},
};
use super::{
    error::Error,
    serialization::{blake2b256, encode_counted_u8, encode_prefixed_bytes, CanonicalEncode},
    util::bytify,
};

/// The content-addressed id of a message: the BLAKE2b-256 hash of its canonical serialization.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl MessageId {
    /// The number of bytes of the id.
    pub const LENGTH: usize = 32;

    /// The all-zero id, used as the genesis entry point.
    pub fn null() -> Self {
        Self([0; Self::LENGTH])
    }

    /// Renders the id as a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        prefix_hex::encode(self.0.as_ref())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for MessageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

impl CanonicalEncode for MessageId {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.0.encode_into(bytes);
    }
}

/// The ordered list of parents referenced by a message.
///
/// A message references between 1 and 8 parents, unique and in ascending lexicographic order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parents(Box<[MessageId]>);

impl Parents {
    /// The smallest number of parents a message can reference.
    pub const COUNT_MIN: usize = 1;
    /// The largest number of parents a message can reference.
    pub const COUNT_MAX: usize = 8;

    /// Creates a validated parent list.
    pub fn new(parents: Vec<MessageId>) -> Result<Self, Error> {
        if !(Self::COUNT_MIN..=Self::COUNT_MAX).contains(&parents.len()) {
            return Err(Error::InvalidParentCount(parents.len()));
        }
        if !parents.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(Error::ParentsNotUniqueSorted);
        }
        Ok(Self(parents.into_boxed_slice()))
    }

    /// Returns an iterator over the parent ids.
    pub fn iter(&self) -> impl Iterator<Item = &MessageId> + '_ {
        self.0.iter()
    }
}

impl Deref for Parents {
    type Target = [MessageId];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl CanonicalEncode for Parents {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        encode_counted_u8(&self.0, bytes);
    }
}

/// The different payload types a message can carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Payload {
    /// A ledger transaction.
    Transaction(Box<TransactionPayload>),
    /// A milestone issued by the coordinator.
    Milestone(Box<MilestonePayload>),
    /// Arbitrary tagged data.
    TaggedData(TaggedDataPayload),
}

impl Payload {
    /// The kind byte of a [`TaggedDataPayload`].
    pub const KIND_TAGGED_DATA: u8 = 5;
    /// The kind byte of a [`TransactionPayload`].
    pub const KIND_TRANSACTION: u8 = 6;
    /// The kind byte of a [`MilestonePayload`].
    pub const KIND_MILESTONE: u8 = 7;
}

impl CanonicalEncode for Payload {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        match self {
            Self::Transaction(payload) => {
                Self::KIND_TRANSACTION.encode_into(bytes);
                payload.encode_into(bytes);
            }
            Self::Milestone(payload) => {
                Self::KIND_MILESTONE.encode_into(bytes);
                payload.encode_into(bytes);
            }
            Self::TaggedData(payload) => {
                Self::KIND_TAGGED_DATA.encode_into(bytes);
                payload.encode_into(bytes);
            }
        }
    }
}

/// An immutable vertex of the Tangle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The protocol version the message was issued under.
    pub protocol_version: u8,
    /// The messages directly approved by this message.
    pub parents: Parents,
    /// The optional payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    /// The proof-of-work nonce.
    pub nonce: u64,
}

impl Message {
    /// Computes the content-addressed id of the message.
    pub fn id(&self) -> MessageId {
        MessageId(blake2b256(&self.to_canonical_bytes()))
    }

    /// Computes the proof-of-work score of the message: two to the power of the number of
    /// trailing zero bits of the message hash, normalized by the serialized size.
    pub fn pow_score(&self) -> f64 {
        let bytes = self.to_canonical_bytes();
        let hash = blake2b256(&bytes);
        let zeros = hash
            .iter()
            .rev()
            .map(|b| b.trailing_zeros())
            .scan(true, |all_zero, z| {
                let zeros = if *all_zero { z } else { 0 };
                *all_zero &= z == 8;
                Some(zeros)
            })
            .sum::<u32>();
        2f64.powi(zeros as i32) / bytes.len() as f64
    }

    /// Returns the milestone payload, if the message carries one.
    pub fn milestone(&self) -> Option<&MilestonePayload> {
        match &self.payload {
            Some(Payload::Milestone(payload)) => Some(payload),
            _ => None,
        }
    }

    /// Returns the transaction payload, if the message carries one.
    pub fn transaction(&self) -> Option<&TransactionPayload> {
        match &self.payload {
            Some(Payload::Transaction(payload)) => Some(payload),
            _ => None,
        }
    }
}

impl CanonicalEncode for Message {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.protocol_version.encode_into(bytes);
        self.parents.encode_into(bytes);
        match &self.payload {
            None => encode_prefixed_bytes(&[], bytes),
            Some(payload) => encode_prefixed_bytes(&payload.to_canonical_bytes(), bytes),
        }
        self.nonce.encode_into(bytes);
    }
}

#[cfg(feature = "rand")]
mod rand {
    use super::*;

    impl MessageId {
        /// Generates a random [`MessageId`].
        pub fn rand() -> Self {
            Self(::rand::random())
        }
    }

    impl Parents {
        /// Generates random parents.
        pub fn rand(len: usize) -> Self {
            let mut parents = std::iter::repeat_with(MessageId::rand).take(len).collect::<Vec<_>>();
            parents.sort_unstable();
            parents.dedup();
            // Panic: the list is sorted, unique and within bounds by construction.
            Self::new(parents).unwrap()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parents_bounds() {
        assert!(matches!(Parents::new(vec![]), Err(Error::InvalidParentCount(0))));
        assert!(matches!(
            Parents::new(vec![MessageId::null(); 9]),
            Err(Error::InvalidParentCount(9))
        ));
    }

    #[test]
    fn test_parents_must_be_ascending() {
        let a = MessageId([1; 32]);
        let b = MessageId([2; 32]);
        assert!(Parents::new(vec![a, b]).is_ok());
        assert!(matches!(Parents::new(vec![b, a]), Err(Error::ParentsNotUniqueSorted)));
        assert!(matches!(Parents::new(vec![a, a]), Err(Error::ParentsNotUniqueSorted)));
    }

    #[test]
    fn test_message_id_is_stable() {
        let message = Message {
            protocol_version: 2,
            parents: Parents::new(vec![MessageId([1; 32])]).unwrap(),
            payload: None,
            nonce: 42,
        };
        assert_eq!(message.id(), message.clone().id());
    }
}
