// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the [`Address`] types.

use std::str::FromStr;

use bech32::{ToBase32, Variant};
use serde::{Deserialize, Serialize};

use super::{
    error::Error,
    output::{AliasId, NftId},
    serialization::{blake2b256, CanonicalEncode},
    util::bytify,
};

/// An address derived from the BLAKE2b-256 hash of an Ed25519 public key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ed25519Address(#[serde(with = "bytify")] pub [u8; Self::LENGTH]);

impl Ed25519Address {
    /// The number of bytes of the address.
    pub const LENGTH: usize = 32;

    /// Derives the address of an Ed25519 public key.
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        Self(blake2b256(public_key))
    }

    /// Renders the address as a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        prefix_hex::encode(self.0.as_ref())
    }
}

impl FromStr for Ed25519Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(prefix_hex::decode(s)?))
    }
}

/// The different address types supported by the network.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Address {
    /// An Ed25519 address.
    Ed25519 {
        /// The hash of the public key.
        address: Ed25519Address,
    },
    /// An Alias address.
    Alias {
        /// The id of the controlling alias output.
        alias_id: AliasId,
    },
    /// An Nft address.
    Nft {
        /// The id of the controlling NFT output.
        nft_id: NftId,
    },
}

impl Address {
    const KIND_ED25519: u8 = 0;
    const KIND_ALIAS: u8 = 8;
    const KIND_NFT: u8 = 16;

    /// Renders the address with the given human-readable prefix.
    pub fn to_bech32(&self, hrp: &str) -> String {
        // Panic: the data is always valid base32 and the hrp is validated by the configuration.
        bech32::encode(hrp, self.to_canonical_bytes().to_base32(), Variant::Bech32)
            .expect("invalid bech32 human-readable part")
    }
}

impl From<Ed25519Address> for Address {
    fn from(address: Ed25519Address) -> Self {
        Self::Ed25519 { address }
    }
}

impl CanonicalEncode for Address {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        match self {
            Self::Ed25519 { address } => {
                Self::KIND_ED25519.encode_into(bytes);
                address.0.encode_into(bytes);
            }
            Self::Alias { alias_id } => {
                Self::KIND_ALIAS.encode_into(bytes);
                alias_id.0.encode_into(bytes);
            }
            Self::Nft { nft_id } => {
                Self::KIND_NFT.encode_into(bytes);
                nft_id.0.encode_into(bytes);
            }
        }
    }
}

#[cfg(feature = "rand")]
mod rand {
    use super::*;

    impl Ed25519Address {
        /// Generates a random [`Ed25519Address`].
        pub fn rand() -> Self {
            Self(::rand::random())
        }
    }

    impl Address {
        /// Generates a random Ed25519 [`Address`].
        pub fn rand_ed25519() -> Self {
            Self::Ed25519 {
                address: Ed25519Address::rand(),
            }
        }

        /// Generates a random alias [`Address`].
        pub fn rand_alias() -> Self {
            Self::Alias { alias_id: AliasId::rand() }
        }

        /// Generates a random nft [`Address`].
        pub fn rand_nft() -> Self {
            Self::Nft { nft_id: NftId::rand() }
        }
    }
}
