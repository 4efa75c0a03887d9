// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The canonical byte serialization that all content-addressed hashing is
//! computed over.
//!
//! Integers are encoded little-endian and fixed width, collections carry a
//! fixed-width count prefix and enums a leading kind byte, so the encoding of
//! a value is unambiguous. Only the encode direction exists; the core never
//! parses messages off the wire.

/// Types that have a canonical byte representation.
pub(crate) trait CanonicalEncode {
    /// Appends the canonical representation of `self` to `bytes`.
    fn encode_into(&self, bytes: &mut Vec<u8>);

    /// Returns the canonical representation of `self` as a byte vector.
    fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.encode_into(&mut bytes);
        bytes
    }
}

impl CanonicalEncode for u8 {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        bytes.push(*self);
    }
}

impl CanonicalEncode for u16 {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_le_bytes());
    }
}

impl CanonicalEncode for u32 {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_le_bytes());
    }
}

impl CanonicalEncode for u64 {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_le_bytes());
    }
}

impl CanonicalEncode for bool {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        bytes.push(*self as u8);
    }
}

impl<const N: usize> CanonicalEncode for [u8; N] {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(self);
    }
}

impl<T: CanonicalEncode> CanonicalEncode for Option<T> {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        match self {
            None => bytes.push(0),
            Some(value) => {
                bytes.push(1);
                value.encode_into(bytes);
            }
        }
    }
}

/// Hashes `data` with BLAKE2b-256, the content-addressing hash of the protocol.
pub(crate) fn blake2b256(data: &[u8]) -> [u8; 32] {
    use crypto::hashes::{blake2b::Blake2b256, Digest};
    Blake2b256::digest(data).into()
}

/// Encodes a collection with a `u8` count prefix.
pub(crate) fn encode_counted_u8<T: CanonicalEncode>(items: &[T], bytes: &mut Vec<u8>) {
    (items.len() as u8).encode_into(bytes);
    for item in items {
        item.encode_into(bytes);
    }
}

/// Encodes a collection with a `u16` count prefix.
pub(crate) fn encode_counted_u16<T: CanonicalEncode>(items: &[T], bytes: &mut Vec<u8>) {
    (items.len() as u16).encode_into(bytes);
    for item in items {
        item.encode_into(bytes);
    }
}

/// Encodes raw bytes with a `u32` length prefix.
pub(crate) fn encode_prefixed_bytes(data: &[u8], bytes: &mut Vec<u8>) {
    (data.len() as u32).encode_into(bytes);
    bytes.extend_from_slice(data);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_width_little_endian() {
        assert_eq!(0x0102_0304u32.to_canonical_bytes(), vec![0x04, 0x03, 0x02, 0x01]);
        assert_eq!(1u8.to_canonical_bytes(), vec![1]);
    }

    #[test]
    fn option_prefix() {
        assert_eq!(None::<u8>.to_canonical_bytes(), vec![0]);
        assert_eq!(Some(7u8).to_canonical_bytes(), vec![1, 7]);
    }

    #[test]
    fn count_prefixes() {
        let mut bytes = Vec::new();
        encode_counted_u16(&[1u8, 2, 3], &mut bytes);
        assert_eq!(bytes, vec![3, 0, 1, 2, 3]);
    }
}
