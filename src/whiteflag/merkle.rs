// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The Merkle tree over message ids whose root a milestone signs.

use crypto::hashes::{blake2b::Blake2b256, Digest, Output};

use crate::types::message::MessageId;

const LEAF_HASH_PREFIX: u8 = 0x00;
const NODE_HASH_PREFIX: u8 = 0x01;

/// Computes BLAKE2b-256 Merkle roots over ordered lists of message ids.
///
/// Leaves are domain-separated from inner nodes by a one-byte prefix. At any level with an
/// odd number of nodes, the last node is lifted unchanged to the next level, which is
/// equivalent to splitting each node at the largest power of two below its leaf count.
pub struct MerkleHasher;

impl MerkleHasher {
    /// Computes the root over the given message ids, in order.
    pub fn hash_message_ids(message_ids: &[MessageId]) -> [u8; 32] {
        let data = message_ids.iter().map(|id| &id.0[..]).collect::<Vec<_>>();
        Self::hash(&data[..]).into()
    }

    fn hash(data: &[impl AsRef<[u8]>]) -> Output<Blake2b256> {
        match data {
            [] => Self::hash_empty(),
            [leaf] => Self::hash_leaf(leaf),
            _ => {
                let k = largest_power_of_two(data.len());
                let l = Self::hash(&data[..k]);
                let r = Self::hash(&data[k..]);
                Self::hash_node(&l, &r)
            }
        }
    }

    fn hash_empty() -> Output<Blake2b256> {
        Blake2b256::digest([])
    }

    fn hash_leaf(l: impl AsRef<[u8]>) -> Output<Blake2b256> {
        let mut hasher = Blake2b256::default();
        hasher.update([LEAF_HASH_PREFIX]);
        hasher.update(l);
        hasher.finalize()
    }

    fn hash_node(l: impl AsRef<[u8]>, r: impl AsRef<[u8]>) -> Output<Blake2b256> {
        let mut hasher = Blake2b256::default();
        hasher.update([NODE_HASH_PREFIX]);
        hasher.update(l);
        hasher.update(r);
        hasher.finalize()
    }
}

/// __NOTE__: Panics for `n < 2`.
fn largest_power_of_two(n: usize) -> usize {
    debug_assert!(n > 1);
    1 << (bit_length((n - 1) as u32) - 1)
}

const fn bit_length(n: u32) -> u32 {
    32 - n.leading_zeros()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    #[should_panic]
    fn test_largest_power_of_two_panics_for_0() {
        let _ = largest_power_of_two(0);
    }

    #[test]
    #[should_panic]
    fn test_largest_power_of_two_panics_for_1() {
        let _ = largest_power_of_two(1);
    }

    #[test]
    fn test_largest_power_of_two_lte_number() {
        assert_eq!(2u32.pow(0) as usize, largest_power_of_two(2));
        assert_eq!(2u32.pow(1) as usize, largest_power_of_two(3));
        assert_eq!(2u32.pow(1) as usize, largest_power_of_two(4));
        assert_eq!(2u32.pow(31) as usize, largest_power_of_two(u32::MAX as usize));
    }

    #[test]
    fn test_merkle_tree_hasher_empty() {
        let root = MerkleHasher::hash_message_ids(&[]);
        assert_eq!(
            prefix_hex::encode(root),
            "0x0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        )
    }

    #[test]
    fn test_merkle_tree_hasher_single() {
        let root = MerkleHasher::hash_message_ids(&[MessageId::from_str(
            "0x52fdfc072182654f163f5f0f9a621d729566c74d10037c4d7bbb0407d1e2c649",
        )
        .unwrap()]);
        assert_eq!(
            prefix_hex::encode(root),
            "0x3d1399c64ff0ae6a074afa4cd2ce4eab8d5c499c1da6afdd1d84b7447cc00544"
        )
    }

    #[test]
    fn test_merkle_tree_root() {
        let message_ids = [
            "0x52fdfc072182654f163f5f0f9a621d729566c74d10037c4d7bbb0407d1e2c649",
            "0x81855ad8681d0d86d1e91e00167939cb6694d2c422acd208a0072939487f6999",
            "0xeb9d18a44784045d87f3c67cf22746e995af5a25367951baa2ff6cd471c483f1",
            "0x5fb90badb37c5821b6d95526a41a9504680b4e7c8b763a1b1d49d4955c848621",
            "0x6325253fec738dd7a9e28bf921119c160f0702448615bbda08313f6a8eb668d2",
            "0x0bf5059875921e668a5bdf2c7fc4844592d2572bcd0668d2d6c52f5054e2d083",
            "0x6bf84c7174cb7476364cc3dbd968b0f7172ed85794bb358b0c3b525da1786f9f",
        ]
        .iter()
        .map(|hash| MessageId::from_str(hash).unwrap())
        .collect::<Vec<_>>();

        let merkle_root = MerkleHasher::hash_message_ids(&message_ids);

        assert_eq!(
            prefix_hex::encode(merkle_root),
            "0xbf67ce7ba23e8c0951b5abaec4f5524360d2c26d971ff226d3359fa70cdb0beb"
        )
    }
}
