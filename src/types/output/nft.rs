// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    encode_features, encode_native_tokens,
    unlock_condition::{
        AddressUnlockCondition, ExpirationUnlockCondition, StorageDepositReturnUnlockCondition,
        TimelockUnlockCondition,
    },
    Feature, NativeToken, OutputAmount,
};
use crate::types::{error::Error, serialization::CanonicalEncode, util::bytify};

/// The id of an NFT chain, assigned when the chain is created.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NftId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl NftId {
    /// The number of bytes of the id.
    pub const LENGTH: usize = 32;

    /// The zero id carried by the output that creates the chain.
    pub fn implicit() -> Self {
        Self([0; Self::LENGTH])
    }

    /// Renders the id as a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        prefix_hex::encode(self.0.as_ref())
    }
}

impl FromStr for NftId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// A non-fungible token output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftOutput {
    /// The amount of base tokens held by the output.
    pub amount: OutputAmount,
    /// The native tokens held by the output.
    pub native_tokens: Box<[NativeToken]>,
    /// The id of the NFT chain.
    pub nft_id: NftId,
    /// The address unlock condition. Always present.
    pub address_unlock_condition: AddressUnlockCondition,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub storage_deposit_return_unlock_condition: Option<StorageDepositReturnUnlockCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub timelock_unlock_condition: Option<TimelockUnlockCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub expiration_unlock_condition: Option<ExpirationUnlockCondition>,
    /// The features attached to the output.
    pub features: Box<[Feature]>,
}

impl CanonicalEncode for NftOutput {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.amount.encode_into(bytes);
        encode_native_tokens(&self.native_tokens, bytes);
        self.nft_id.0.encode_into(bytes);
        let mut count = 1u8;
        count += self.storage_deposit_return_unlock_condition.is_some() as u8;
        count += self.timelock_unlock_condition.is_some() as u8;
        count += self.expiration_unlock_condition.is_some() as u8;
        count.encode_into(bytes);
        self.address_unlock_condition.encode_into(bytes);
        if let Some(condition) = &self.storage_deposit_return_unlock_condition {
            condition.encode_into(bytes);
        }
        if let Some(condition) = &self.timelock_unlock_condition {
            condition.encode_into(bytes);
        }
        if let Some(condition) = &self.expiration_unlock_condition {
            condition.encode_into(bytes);
        }
        encode_features(&self.features, bytes);
    }
}

#[cfg(feature = "rand")]
mod rand {
    use super::*;

    impl NftId {
        /// Generates a random [`NftId`].
        pub fn rand() -> Self {
            Self(::rand::random())
        }
    }
}
