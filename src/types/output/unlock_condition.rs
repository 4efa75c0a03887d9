// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use super::OutputAmount;
use crate::types::{address::Address, serialization::CanonicalEncode, tangle::MilestoneTimestamp};

/// Makes the output unlockable by an address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressUnlockCondition {
    /// The address that owns the output.
    pub address: Address,
}

/// Requires the consumer of the output to return the storage deposit to the sender.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDepositReturnUnlockCondition {
    /// The address the deposit has to be returned to.
    pub return_address: Address,
    /// The amount that has to be returned.
    pub amount: OutputAmount,
}

/// Locks the output until a milestone timestamp is reached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockUnlockCondition {
    /// The timestamp before which the output cannot be consumed.
    pub timestamp: MilestoneTimestamp,
}

/// Returns the output to the sender once a milestone timestamp is reached.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationUnlockCondition {
    /// The address that owns the output after expiration.
    pub return_address: Address,
    /// The timestamp at which ownership changes.
    pub timestamp: MilestoneTimestamp,
}

/// Makes the state of an alias output mutable by an address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateControllerAddressUnlockCondition {
    /// The state controller address.
    pub address: Address,
}

/// Makes the governance of an alias output mutable by an address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernorAddressUnlockCondition {
    /// The governor address.
    pub address: Address,
}

/// Binds a foundry output to the alias that controls it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmutableAliasAddressUnlockCondition {
    /// The controlling alias address.
    pub address: Address,
}

const TYPE_ADDRESS: u8 = 0;
const TYPE_STORAGE_DEPOSIT_RETURN: u8 = 1;
const TYPE_TIMELOCK: u8 = 2;
const TYPE_EXPIRATION: u8 = 3;
const TYPE_STATE_CONTROLLER_ADDRESS: u8 = 4;
const TYPE_GOVERNOR_ADDRESS: u8 = 5;
const TYPE_IMMUTABLE_ALIAS_ADDRESS: u8 = 6;

impl CanonicalEncode for AddressUnlockCondition {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        TYPE_ADDRESS.encode_into(bytes);
        self.address.encode_into(bytes);
    }
}

impl CanonicalEncode for StorageDepositReturnUnlockCondition {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        TYPE_STORAGE_DEPOSIT_RETURN.encode_into(bytes);
        self.return_address.encode_into(bytes);
        self.amount.encode_into(bytes);
    }
}

impl CanonicalEncode for TimelockUnlockCondition {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        TYPE_TIMELOCK.encode_into(bytes);
        self.timestamp.encode_into(bytes);
    }
}

impl CanonicalEncode for ExpirationUnlockCondition {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        TYPE_EXPIRATION.encode_into(bytes);
        self.return_address.encode_into(bytes);
        self.timestamp.encode_into(bytes);
    }
}

impl CanonicalEncode for StateControllerAddressUnlockCondition {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        TYPE_STATE_CONTROLLER_ADDRESS.encode_into(bytes);
        self.address.encode_into(bytes);
    }
}

impl CanonicalEncode for GovernorAddressUnlockCondition {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        TYPE_GOVERNOR_ADDRESS.encode_into(bytes);
        self.address.encode_into(bytes);
    }
}

impl CanonicalEncode for ImmutableAliasAddressUnlockCondition {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        TYPE_IMMUTABLE_ALIAS_ADDRESS.encode_into(bytes);
        self.address.encode_into(bytes);
    }
}
