// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::types::{
    address::Address,
    serialization::{encode_prefixed_bytes, CanonicalEncode},
};

/// The different feature types that can be attached to an output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Feature {
    /// Identifies the validated sender of the output.
    Sender {
        /// The sender address.
        address: Address,
    },
    /// Arbitrary binary metadata attached by the creator.
    Metadata {
        /// The metadata bytes.
        #[serde(with = "serde_bytes")]
        data: Vec<u8>,
    },
    /// An arbitrary indexation tag.
    Tag {
        /// The tag bytes.
        #[serde(with = "serde_bytes")]
        tag: Vec<u8>,
    },
}

impl Feature {
    const KIND_SENDER: u8 = 0;
    const KIND_METADATA: u8 = 2;
    const KIND_TAG: u8 = 3;
}

impl CanonicalEncode for Feature {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        match self {
            Self::Sender { address } => {
                Self::KIND_SENDER.encode_into(bytes);
                address.encode_into(bytes);
            }
            Self::Metadata { data } => {
                Self::KIND_METADATA.encode_into(bytes);
                encode_prefixed_bytes(data, bytes);
            }
            Self::Tag { tag } => {
                Self::KIND_TAG.encode_into(bytes);
                encode_prefixed_bytes(tag, bytes);
            }
        }
    }
}
