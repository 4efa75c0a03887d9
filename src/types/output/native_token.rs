// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Borrow, mem::size_of, str::FromStr};

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::types::{error::Error, serialization::CanonicalEncode, util::bytify};

/// Represents the amount of native tokens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeTokenAmount(#[serde(with = "bytify")] pub [u8; size_of::<U256>()]);

impl<T: Borrow<U256>> From<T> for NativeTokenAmount {
    fn from(value: T) -> Self {
        let mut amount = [0; size_of::<U256>()];
        value.borrow().to_big_endian(&mut amount);
        Self(amount)
    }
}

impl From<NativeTokenAmount> for U256 {
    fn from(value: NativeTokenAmount) -> Self {
        U256::from_big_endian(&value.0)
    }
}

impl CanonicalEncode for NativeTokenAmount {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.0.encode_into(bytes);
    }
}

/// The global id of a native token, derived from the minting foundry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeTokenId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl NativeTokenId {
    /// The number of bytes of the id.
    pub const LENGTH: usize = 38;
}

impl FromStr for NativeTokenId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

impl CanonicalEncode for NativeTokenId {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.0.encode_into(bytes);
    }
}

/// Defines information about the underlying token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TokenScheme {
    /// The simple token scheme.
    Simple {
        /// The amount of minted (created) tokens.
        minted_tokens: NativeTokenAmount,
        /// The amount of melted (destroyed) tokens.
        melted_tokens: NativeTokenAmount,
        /// The maximum amount of tokens.
        maximum_supply: NativeTokenAmount,
    },
}

impl CanonicalEncode for TokenScheme {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        match self {
            Self::Simple {
                minted_tokens,
                melted_tokens,
                maximum_supply,
            } => {
                0u8.encode_into(bytes);
                minted_tokens.encode_into(bytes);
                melted_tokens.encode_into(bytes);
                maximum_supply.encode_into(bytes);
            }
        }
    }
}

/// Represents a native token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeToken {
    /// The corresponding token id.
    pub token_id: NativeTokenId,
    /// The amount of native tokens.
    pub amount: NativeTokenAmount,
}

impl CanonicalEncode for NativeToken {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.token_id.encode_into(bytes);
        self.amount.encode_into(bytes);
    }
}

#[cfg(feature = "rand")]
mod rand {
    use super::*;

    impl NativeTokenAmount {
        /// Generates a random [`NativeTokenAmount`].
        pub fn rand() -> Self {
            U256::from_little_endian(&::rand::random::<[u8; 32]>()).max(1.into()).into()
        }
    }

    impl NativeTokenId {
        /// Generates a random [`NativeTokenId`].
        pub fn rand() -> Self {
            let mut bytes = [0; Self::LENGTH];
            ::rand::RngCore::fill_bytes(&mut ::rand::thread_rng(), &mut bytes);
            Self(bytes)
        }
    }

    impl NativeToken {
        /// Generates a random [`NativeToken`].
        pub fn rand() -> Self {
            Self {
                token_id: NativeTokenId::rand(),
                amount: NativeTokenAmount::rand(),
            }
        }
    }
}
