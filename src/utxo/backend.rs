// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The write-ahead journal behind the UTXO manager.

use std::{convert::Infallible, sync::Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::diff::{MilestoneDiff, TreasuryRecord};
use crate::types::ledger::LedgerOutput;

/// A single record of the ledger journal.
///
/// A confirmation groups all of its changes under one entry, so that a crash between the
/// journal write and the in-memory commit loses nothing: replaying the journal reproduces the
/// exact post-apply state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum JournalEntry {
    /// An output booked outside a confirmation, e.g. imported from a snapshot.
    UnspentOutput(Box<LedgerOutput>),
    /// A treasury booked outside a confirmation.
    Treasury(TreasuryRecord),
    /// All mutations of one applied milestone.
    Confirmation(Box<MilestoneDiff>),
}

/// The persistence behind the UTXO manager.
///
/// `append` must be atomic and durable: once it returns, a restart replays the entry.
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// The error type of the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reads back all journal entries, oldest first.
    async fn journal(&self) -> Result<Vec<JournalEntry>, Self::Error>;

    /// Durably appends one entry to the journal.
    async fn append(&self, entry: &JournalEntry) -> Result<(), Self::Error>;
}

#[async_trait]
impl<B: LedgerBackend> LedgerBackend for std::sync::Arc<B> {
    type Error = B::Error;

    async fn journal(&self) -> Result<Vec<JournalEntry>, Self::Error> {
        (**self).journal().await
    }

    async fn append(&self, entry: &JournalEntry) -> Result<(), Self::Error> {
        (**self).append(entry).await
    }
}

/// A journal kept in memory.
///
/// This is the reference behavior of the trait and the backend used by the test suites; a
/// disk-backed implementation persists the serialized entries instead.
#[derive(Debug, Default)]
pub struct MemoryLedgerBackend {
    journal: Mutex<Vec<JournalEntry>>,
}

impl MemoryLedgerBackend {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerBackend for MemoryLedgerBackend {
    type Error = Infallible;

    async fn journal(&self) -> Result<Vec<JournalEntry>, Self::Error> {
        // Panic: the lock is never held across a panic.
        Ok(self.journal.lock().unwrap().clone())
    }

    async fn append(&self, entry: &JournalEntry) -> Result<(), Self::Error> {
        // Panic: the lock is never held across a panic.
        self.journal.lock().unwrap().push(entry.clone());
        Ok(())
    }
}
