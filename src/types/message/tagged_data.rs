// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::types::serialization::{encode_prefixed_bytes, CanonicalEncode};

/// Arbitrary data attached to the Tangle under an indexation tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedDataPayload {
    /// The indexation tag.
    #[serde(with = "serde_bytes")]
    pub tag: Vec<u8>,
    /// The data bytes.
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

impl CanonicalEncode for TaggedDataPayload {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        (self.tag.len() as u8).encode_into(bytes);
        bytes.extend_from_slice(&self.tag);
        encode_prefixed_bytes(&self.data, bytes);
    }
}
