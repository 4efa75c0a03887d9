// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use super::{
    encode_features, encode_native_tokens,
    unlock_condition::{
        AddressUnlockCondition, ExpirationUnlockCondition, StorageDepositReturnUnlockCondition,
        TimelockUnlockCondition,
    },
    Feature, NativeToken, OutputAmount,
};
use crate::types::serialization::CanonicalEncode;

/// A plain value output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicOutput {
    /// The amount of base tokens held by the output.
    pub amount: OutputAmount,
    /// The native tokens held by the output.
    pub native_tokens: Box<[NativeToken]>,
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

impl BasicOutput {
    /// Creates a basic output holding `amount` tokens, owned by `address`, with no further
    /// conditions or features.
    pub fn simple(amount: impl Into<OutputAmount>, address: impl Into<crate::types::address::Address>) -> Self {
        Self {
            amount: amount.into(),
            native_tokens: Box::new([]),
            address_unlock_condition: AddressUnlockCondition { address: address.into() },
            storage_deposit_return_unlock_condition: None,
            timelock_unlock_condition: None,
            expiration_unlock_condition: None,
            features: Box::new([]),
        }
    }
}

impl CanonicalEncode for BasicOutput {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.amount.encode_into(bytes);
        encode_native_tokens(&self.native_tokens, bytes);
        // Unlock conditions are encoded in ascending type order, absent ones are elided.
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
