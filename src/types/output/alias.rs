// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{
    encode_features, encode_native_tokens,
    unlock_condition::{GovernorAddressUnlockCondition, StateControllerAddressUnlockCondition},
    Feature, NativeToken, OutputAmount,
};
use crate::types::{
    error::Error,
    serialization::{encode_prefixed_bytes, CanonicalEncode},
    util::bytify,
};

/// The id of an alias chain, assigned when the chain is created.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasId(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl AliasId {
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

impl FromStr for AliasId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// A stateful chain output controlled by a state controller and a governor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasOutput {
    /// The amount of base tokens held by the output.
    pub amount: OutputAmount,
    /// The native tokens held by the output.
    pub native_tokens: Box<[NativeToken]>,
    /// The id of the alias chain.
    pub alias_id: AliasId,
    /// The state index, incremented on every state transition.
    pub state_index: u32,
    /// The state metadata bytes.
    #[serde(with = "serde_bytes")]
    pub state_metadata: Vec<u8>,
    /// The number of foundries created by the alias.
    pub foundry_counter: u32,
    #[allow(missing_docs)]
    pub state_controller_address_unlock_condition: StateControllerAddressUnlockCondition,
    #[allow(missing_docs)]
    pub governor_address_unlock_condition: GovernorAddressUnlockCondition,
    /// The features attached to the output.
    pub features: Box<[Feature]>,
}

impl CanonicalEncode for AliasOutput {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.amount.encode_into(bytes);
        encode_native_tokens(&self.native_tokens, bytes);
        self.alias_id.0.encode_into(bytes);
        self.state_index.encode_into(bytes);
        encode_prefixed_bytes(&self.state_metadata, bytes);
        self.foundry_counter.encode_into(bytes);
        2u8.encode_into(bytes);
        self.state_controller_address_unlock_condition.encode_into(bytes);
        self.governor_address_unlock_condition.encode_into(bytes);
        encode_features(&self.features, bytes);
    }
}

#[cfg(feature = "rand")]
mod rand {
    use super::*;

    impl AliasId {
        /// Generates a random [`AliasId`].
        pub fn rand() -> Self {
            Self(::rand::random())
        }
    }
}
