// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use super::{
    encode_features, encode_native_tokens, unlock_condition::ImmutableAliasAddressUnlockCondition, Feature,
    NativeToken, NativeTokenId, OutputAmount, TokenScheme,
};
use crate::types::serialization::CanonicalEncode;

/// A token-minting output bound to the alias that controls it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundryOutput {
    /// The amount of base tokens held by the output.
    pub amount: OutputAmount,
    /// The native tokens held by the output.
    pub native_tokens: Box<[NativeToken]>,
    /// The serial number of the foundry within its alias.
    pub serial_number: u32,
    /// The token scheme of the minted tokens.
    pub token_scheme: TokenScheme,
    #[allow(missing_docs)]
    pub immutable_alias_address_unlock_condition: ImmutableAliasAddressUnlockCondition,
    /// The features attached to the output.
    pub features: Box<[Feature]>,
}

impl FoundryOutput {
    /// The id of the native token minted by this foundry: the controlling alias address, the
    /// serial number and the token scheme kind.
    pub fn native_token_id(&self) -> NativeTokenId {
        let mut bytes = Vec::with_capacity(NativeTokenId::LENGTH);
        self.immutable_alias_address_unlock_condition.address.encode_into(&mut bytes);
        self.serial_number.encode_into(&mut bytes);
        match self.token_scheme {
            TokenScheme::Simple { .. } => 0u8.encode_into(&mut bytes),
        }
        // Panic: the derivation writes exactly the id length.
        NativeTokenId(bytes.try_into().unwrap())
    }
}

impl CanonicalEncode for FoundryOutput {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.amount.encode_into(bytes);
        encode_native_tokens(&self.native_tokens, bytes);
        self.serial_number.encode_into(bytes);
        self.token_scheme.encode_into(bytes);
        1u8.encode_into(bytes);
        self.immutable_alias_address_unlock_condition.encode_into(bytes);
        encode_features(&self.features, bytes);
    }
}
