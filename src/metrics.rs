// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the node-wide confirmation counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter. Increments are atomic and carry no ordering contract.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    /// Increments the counter by one.
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// The current value of the counter.
    pub fn value(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counters over everything the confirmation core has done since startup.
#[derive(Debug, Default)]
pub struct ServerMetrics {
    /// The number of messages referenced by milestones.
    pub referenced_messages: Counter,
    /// The number of referenced messages with an applied transaction.
    pub included_transaction_messages: Counter,
    /// The number of referenced messages without a transaction.
    pub no_transaction_messages: Counter,
    /// The number of referenced messages with a conflicting transaction.
    pub conflicting_transaction_messages: Counter,
    /// The number of confirmed milestones.
    pub confirmed_milestones: Counter,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_counter_increments() {
        let counter = Counter::default();
        counter.incr();
        counter.incr();
        assert_eq!(counter.value(), 2);
    }
}
