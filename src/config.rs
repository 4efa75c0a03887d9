// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the protocol configuration of the confirmation core.

use serde::{Deserialize, Serialize};

use crate::types::{serialization::blake2b256, tangle::MilestoneIndex};

/// Parameters relevant to storage cost calculations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RentStructure {
    /// The cost of one virtual byte.
    pub v_byte_cost: u32,
    /// The weight of data fields.
    pub v_byte_factor_data: u32,
    /// The weight of key fields.
    pub v_byte_factor_key: u32,
}

/// A public key of the coordinator, valid within a range of milestone indexes.
///
/// Milestone signature verification happens before a milestone reaches this core; the ranges
/// are carried so that collaborators can be configured from the same source.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicKeyRange {
    /// The hex encoded public key.
    pub public_key: String,
    /// The first index the key is valid for.
    pub start_index: MilestoneIndex,
    /// The last index the key is valid for; zero means unbounded.
    pub end_index: MilestoneIndex,
}

/// The protocol parameters the confirmation core operates under.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// The name of the network; its hash is the network id transactions sign over.
    pub network_id_name: String,
    /// The minimum proof-of-work score of an admissible message.
    pub min_pow_score: u32,
    /// The human-readable prefix used when rendering addresses.
    pub bech32_hrp: String,
    /// The coordinator public keys and their validity ranges.
    pub public_key_ranges: Vec<PublicKeyRange>,
    /// The storage cost parameters applied during semantic validation.
    pub rent_structure: RentStructure,
    /// The total amount of base tokens in circulation.
    #[serde(with = "crate::types::util::stringify")]
    pub token_supply: u64,
}

impl ProtocolConfig {
    /// The network id derived from the network name: the first eight bytes of its BLAKE2b-256
    /// hash, interpreted little-endian.
    pub fn network_id(&self) -> u64 {
        let hash = blake2b256(self.network_id_name.as_bytes());
        // Panic: the slice is exactly eight bytes long.
        u64::from_le_bytes(hash[..8].try_into().unwrap())
    }

    /// Renders an address with the configured human-readable prefix.
    pub fn render_address(&self, address: &crate::types::address::Address) -> String {
        address.to_bech32(&self.bech32_hrp)
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            network_id_name: "private-tangle".to_string(),
            min_pow_score: 0,
            bech32_hrp: "tst".to_string(),
            public_key_ranges: Vec::new(),
            rent_structure: RentStructure {
                v_byte_cost: 0,
                v_byte_factor_data: 1,
                v_byte_factor_key: 10,
            },
            token_supply: 2_779_530_283_277_761,
        }
    }
}
