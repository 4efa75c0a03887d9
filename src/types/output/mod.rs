// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the output types.

mod feature;
mod native_token;
mod unlock_condition;

// The different output types
pub mod alias;
pub mod basic;
pub mod foundry;
pub mod nft;
pub mod treasury;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use self::{
    alias::{AliasId, AliasOutput},
    basic::BasicOutput,
    feature::Feature,
    foundry::FoundryOutput,
    native_token::{NativeToken, NativeTokenAmount, NativeTokenId, TokenScheme},
    nft::{NftId, NftOutput},
    treasury::TreasuryOutput,
    unlock_condition::{
        AddressUnlockCondition, ExpirationUnlockCondition, GovernorAddressUnlockCondition,
        ImmutableAliasAddressUnlockCondition, StateControllerAddressUnlockCondition,
        StorageDepositReturnUnlockCondition, TimelockUnlockCondition,
    },
};
use super::{
    error::Error,
    message::transaction::TransactionId,
    serialization::{encode_counted_u16, CanonicalEncode},
};

/// The amount of base tokens held by an output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, derive_more::From)]
pub struct OutputAmount(#[serde(with = "crate::types::util::stringify")] pub u64);

impl CanonicalEncode for OutputAmount {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.0.encode_into(bytes);
    }
}

/// The position of an output within the transaction that created it.
pub type OutputIndex = u16;

/// The id of an output: the id of the creating transaction plus the output index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputId {
    /// The id of the creating transaction.
    pub transaction_id: TransactionId,
    /// The position within the creating transaction.
    pub index: OutputIndex,
}

impl OutputId {
    /// The number of bytes of the hex encoded id.
    pub const LENGTH: usize = TransactionId::LENGTH + std::mem::size_of::<OutputIndex>();

    /// Renders the id as a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        prefix_hex::encode([self.transaction_id.0.as_ref(), &self.index.to_le_bytes()].concat())
    }
}

impl std::fmt::Display for OutputId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for OutputId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes: [u8; Self::LENGTH] = prefix_hex::decode(s)?;
        let (transaction_id, index) = bytes.split_at(TransactionId::LENGTH);
        Ok(Self {
            // Panic: the lengths are guaranteed by the split.
            transaction_id: TransactionId(transaction_id.try_into().unwrap()),
            index: OutputIndex::from_le_bytes(index.try_into().unwrap()),
        })
    }
}

impl CanonicalEncode for OutputId {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.transaction_id.0.encode_into(bytes);
        self.index.encode_into(bytes);
    }
}

/// The different output types of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Output {
    /// The singleton output holding the migration treasury.
    Treasury(TreasuryOutput),
    /// A plain value output.
    Basic(BasicOutput),
    /// A stateful chain output.
    Alias(AliasOutput),
    /// A token-minting output controlled by an alias.
    Foundry(FoundryOutput),
    /// A non-fungible token output.
    Nft(NftOutput),
}

impl Output {
    /// The kind byte of a [`TreasuryOutput`].
    pub const KIND_TREASURY: u8 = 2;
    /// The kind byte of a [`BasicOutput`].
    pub const KIND_BASIC: u8 = 3;
    /// The kind byte of an [`AliasOutput`].
    pub const KIND_ALIAS: u8 = 4;
    /// The kind byte of a [`FoundryOutput`].
    pub const KIND_FOUNDRY: u8 = 5;
    /// The kind byte of an [`NftOutput`].
    pub const KIND_NFT: u8 = 6;

    /// Returns the amount of base tokens held by the output.
    pub fn amount(&self) -> OutputAmount {
        match self {
            Self::Treasury(TreasuryOutput { amount, .. }) => *amount,
            Self::Basic(BasicOutput { amount, .. }) => *amount,
            Self::Alias(AliasOutput { amount, .. }) => *amount,
            Self::Foundry(FoundryOutput { amount, .. }) => *amount,
            Self::Nft(NftOutput { amount, .. }) => *amount,
        }
    }

    /// Returns the native tokens held by the output.
    pub fn native_tokens(&self) -> &[NativeToken] {
        match self {
            Self::Treasury(_) => &[],
            Self::Basic(BasicOutput { native_tokens, .. }) => native_tokens,
            Self::Alias(AliasOutput { native_tokens, .. }) => native_tokens,
            Self::Foundry(FoundryOutput { native_tokens, .. }) => native_tokens,
            Self::Nft(NftOutput { native_tokens, .. }) => native_tokens,
        }
    }

    /// Returns the features of the output.
    pub fn features(&self) -> &[Feature] {
        match self {
            Self::Treasury(_) => &[],
            Self::Basic(BasicOutput { features, .. }) => features,
            Self::Alias(AliasOutput { features, .. }) => features,
            Self::Foundry(FoundryOutput { features, .. }) => features,
            Self::Nft(NftOutput { features, .. }) => features,
        }
    }
}

impl CanonicalEncode for Output {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        match self {
            Self::Treasury(output) => {
                Self::KIND_TREASURY.encode_into(bytes);
                output.encode_into(bytes);
            }
            Self::Basic(output) => {
                Self::KIND_BASIC.encode_into(bytes);
                output.encode_into(bytes);
            }
            Self::Alias(output) => {
                Self::KIND_ALIAS.encode_into(bytes);
                output.encode_into(bytes);
            }
            Self::Foundry(output) => {
                Self::KIND_FOUNDRY.encode_into(bytes);
                output.encode_into(bytes);
            }
            Self::Nft(output) => {
                Self::KIND_NFT.encode_into(bytes);
                output.encode_into(bytes);
            }
        }
    }
}

pub(crate) fn encode_native_tokens(native_tokens: &[NativeToken], bytes: &mut Vec<u8>) {
    encode_counted_u16(native_tokens, bytes);
}

pub(crate) fn encode_features(features: &[Feature], bytes: &mut Vec<u8>) {
    encode_counted_u16(features, bytes);
}

#[cfg(feature = "rand")]
mod rand {
    use super::*;

    impl OutputId {
        /// Generates a random [`OutputId`].
        pub fn rand() -> Self {
            Self {
                transaction_id: TransactionId::rand(),
                index: ::rand::random::<u16>() % 128,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_output_id_hex_round_trip() {
        let output_id = OutputId {
            transaction_id: TransactionId([0xfd; 32]),
            index: 0x2a,
        };
        assert_eq!(output_id, OutputId::from_str(&output_id.to_hex()).unwrap());
    }
}
