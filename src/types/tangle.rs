// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains tangle-wide scalar types.

use std::{fmt, num::ParseIntError, ops, str::FromStr};

use derive_more::{Add, Deref, DerefMut, Sub};
use serde::{Deserialize, Serialize};

use super::serialization::CanonicalEncode;

/// The index of a milestone, counting from the genesis milestone at 1.
#[derive(
    Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize, Add, Sub, Deref, DerefMut,
)]
#[serde(transparent)]
pub struct MilestoneIndex(pub u32);

impl fmt::Display for MilestoneIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for MilestoneIndex {
    fn from(value: u32) -> Self {
        MilestoneIndex(value)
    }
}

impl From<MilestoneIndex> for u32 {
    fn from(value: MilestoneIndex) -> Self {
        value.0
    }
}

impl ops::Add<u32> for MilestoneIndex {
    type Output = Self;

    fn add(self, x: u32) -> Self {
        MilestoneIndex(self.0 + x)
    }
}

impl ops::AddAssign<u32> for MilestoneIndex {
    fn add_assign(&mut self, x: u32) {
        self.0 += x
    }
}

impl ops::Sub<u32> for MilestoneIndex {
    type Output = Self;

    fn sub(self, x: u32) -> Self {
        MilestoneIndex(self.0 - x)
    }
}

impl PartialEq<u32> for MilestoneIndex {
    fn eq(&self, x: &u32) -> bool {
        self.0 == *x
    }
}

impl PartialEq<MilestoneIndex> for u32 {
    fn eq(&self, x: &MilestoneIndex) -> bool {
        *self == x.0
    }
}

impl FromStr for MilestoneIndex {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(u32::from_str(s)?.into())
    }
}

impl CanonicalEncode for MilestoneIndex {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.0.encode_into(bytes);
    }
}

/// The Unix timestamp of a milestone, in seconds.
#[derive(
    Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize, Deref, DerefMut,
)]
#[serde(transparent)]
pub struct MilestoneTimestamp(pub u32);

impl fmt::Display for MilestoneTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for MilestoneTimestamp {
    fn from(value: u32) -> Self {
        MilestoneTimestamp(value)
    }
}

impl From<MilestoneTimestamp> for u32 {
    fn from(value: MilestoneTimestamp) -> Self {
        value.0
    }
}

impl CanonicalEncode for MilestoneTimestamp {
    fn encode_into(&self, bytes: &mut Vec<u8>) {
        self.0.encode_into(bytes);
    }
}

/// A milestone index paired with the timestamp of the same milestone.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MilestoneIndexTimestamp {
    /// The milestone index.
    pub milestone_index: MilestoneIndex,
    /// The milestone timestamp.
    pub milestone_timestamp: MilestoneTimestamp,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_assign() {
        let mut a = MilestoneIndex(42);
        a += 1;
        assert_eq!(a, MilestoneIndex(43))
    }

    #[test]
    fn add_u32() {
        assert_eq!(MilestoneIndex(42) + 1, MilestoneIndex(43))
    }
}
