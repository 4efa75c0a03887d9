// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the UTXO ledger: the unspent and spent output sets, the treasury, the
//! per-milestone diff log, and the manager that mutates them atomically.

mod backend;
mod diff;
mod error;
mod receipt;

use std::collections::{BTreeMap, HashMap, HashSet};

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

pub use self::{
    backend::{JournalEntry, LedgerBackend, MemoryLedgerBackend},
    diff::{MilestoneDiff, TreasuryMutation, TreasuryRecord},
    error::LedgerError,
    receipt::{receipt_to_outputs, validate_receipt, ReceiptError, ReceiptRecord, MAX_MIGRATED_FUNDS_COUNT},
};
use crate::types::{
    ledger::{LedgerOutput, LedgerSpent},
    message::MilestoneId,
    output::OutputId,
    tangle::MilestoneIndex,
};

/// The complete ledger state at one ledger index.
///
/// The unspent and spent sets partition all outputs ever created; applying a milestone moves
/// consumed outputs from one side of the partition to the other.
#[derive(Debug, Default)]
pub struct LedgerState {
    unspent: HashMap<OutputId, LedgerOutput>,
    spent: HashMap<OutputId, LedgerSpent>,
    treasury: Option<TreasuryRecord>,
    ledger_index: MilestoneIndex,
    previous_milestone_id: MilestoneId,
    diffs: BTreeMap<MilestoneIndex, MilestoneDiff>,
}

impl LedgerState {
    /// The index of the most recently applied milestone.
    pub fn ledger_index(&self) -> MilestoneIndex {
        self.ledger_index
    }

    /// The id of the most recently applied milestone; the null id before the first apply.
    pub fn previous_milestone_id(&self) -> MilestoneId {
        self.previous_milestone_id
    }

    /// Looks up an output in the unspent set.
    pub fn unspent_output(&self, output_id: &OutputId) -> Option<&LedgerOutput> {
        self.unspent.get(output_id)
    }

    /// Looks up an output in the spent set.
    pub fn spent_output(&self, output_id: &OutputId) -> Option<&LedgerSpent> {
        self.spent.get(output_id)
    }

    /// Whether the output has been consumed.
    pub fn is_output_spent(&self, output_id: &OutputId) -> bool {
        self.spent.contains_key(output_id)
    }

    /// The current treasury, if one has been booked.
    pub fn unspent_treasury(&self) -> Option<&TreasuryRecord> {
        self.treasury.as_ref()
    }

    /// The diff recorded for a milestone index.
    pub fn milestone_diff(&self, index: MilestoneIndex) -> Option<&MilestoneDiff> {
        self.diffs.get(&index)
    }

    /// Iterates over the unspent outputs, in no particular order.
    pub fn unspent_outputs(&self) -> impl Iterator<Item = &LedgerOutput> {
        self.unspent.values()
    }

    /// The total amount held by the unspent set.
    pub fn unspent_amount(&self) -> u128 {
        self.unspent.values().map(|output| output.amount().0 as u128).sum()
    }

    /// Commits a validated diff to the in-memory maps.
    fn commit(&mut self, diff: MilestoneDiff) {
        for output in &diff.created_outputs {
            self.unspent.insert(output.output_id, output.clone());
        }
        for spent in &diff.consumed_outputs {
            self.unspent.remove(&spent.output.output_id);
            self.spent.insert(spent.output.output_id, spent.clone());
        }
        if let Some(mutation) = &diff.treasury {
            self.treasury = Some(mutation.created.clone());
        }
        self.ledger_index = diff.index;
        self.previous_milestone_id = diff.milestone_id;
        self.diffs.insert(diff.index, diff);
    }

    /// Replays a journal entry; used when opening the manager.
    fn replay(&mut self, entry: JournalEntry) {
        match entry {
            JournalEntry::UnspentOutput(output) => {
                self.unspent.insert(output.output_id, *output);
            }
            JournalEntry::Treasury(treasury) => {
                self.treasury = Some(treasury);
            }
            JournalEntry::Confirmation(diff) => {
                self.commit(*diff);
            }
        }
    }
}

/// Owns the ledger state and sequences all access to it.
///
/// Readers share the state through [`read`](Self::read); the single confirmation task holds
/// [`write`](Self::write) for the full duration of a confirmation, so everything it reads is
/// a frozen snapshot and everything it writes becomes visible at once.
#[derive(Debug)]
pub struct UtxoManager<B> {
    ledger: RwLock<LedgerState>,
    backend: B,
}

impl<B: LedgerBackend> UtxoManager<B> {
    /// Opens the ledger over a backend, replaying its journal.
    pub async fn open(backend: B) -> Result<Self, LedgerError> {
        let mut state = LedgerState::default();
        let journal = backend
            .journal()
            .await
            .map_err(|e| LedgerError::Backend(Box::new(e)))?;
        let entries = journal.len();
        for entry in journal {
            state.replay(entry);
        }
        debug!(entries, ledger_index = %state.ledger_index(), "ledger journal replayed");
        Ok(Self {
            ledger: RwLock::new(state),
            backend,
        })
    }

    /// Acquires the ledger for shared reading.
    pub async fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.ledger.read().await
    }

    /// Acquires the ledger for exclusive mutation.
    pub async fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.ledger.write().await
    }

    /// Books an output outside a confirmation, e.g. while importing a snapshot.
    pub async fn add_unspent_output(&self, output: LedgerOutput) -> Result<(), LedgerError> {
        let mut ledger = self.ledger.write().await;
        self.backend
            .append(&JournalEntry::UnspentOutput(Box::new(output.clone())))
            .await
            .map_err(|e| LedgerError::Backend(Box::new(e)))?;
        ledger.unspent.insert(output.output_id, output);
        Ok(())
    }

    /// Books a treasury outside a confirmation.
    pub async fn bootstrap_treasury(&self, treasury: TreasuryRecord) -> Result<(), LedgerError> {
        let mut ledger = self.ledger.write().await;
        self.backend
            .append(&JournalEntry::Treasury(treasury.clone()))
            .await
            .map_err(|e| LedgerError::Backend(Box::new(e)))?;
        ledger.treasury = Some(treasury);
        Ok(())
    }

    /// Applies all mutations of one milestone to the ledger.
    ///
    /// The caller must hold the write guard; everything the confirmation computed against that
    /// guard is still true when the apply runs. The whole operation is atomic: the journal
    /// records the diff under the milestone index before any map changes, and the in-memory
    /// commit cannot fail.
    pub async fn apply_confirmation(
        &self,
        ledger: &mut LedgerState,
        diff: MilestoneDiff,
    ) -> Result<(), LedgerError> {
        let expected = ledger.ledger_index + 1;
        if diff.index != expected {
            return Err(LedgerError::LedgerIndexGap {
                expected,
                actual: diff.index,
            });
        }

        let mut created_ids = HashSet::with_capacity(diff.created_outputs.len());
        for output in &diff.created_outputs {
            if ledger.unspent.contains_key(&output.output_id)
                || ledger.spent.contains_key(&output.output_id)
                || !created_ids.insert(output.output_id)
            {
                return Err(LedgerError::DuplicateCreate(output.output_id));
            }
        }

        let mut consumed_ids = HashSet::with_capacity(diff.consumed_outputs.len());
        for spent in &diff.consumed_outputs {
            let output_id = spent.output.output_id;
            let unspent = ledger.unspent.contains_key(&output_id) || created_ids.contains(&output_id);
            if !unspent || ledger.spent.contains_key(&output_id) || !consumed_ids.insert(output_id) {
                return Err(LedgerError::DoubleSpend(output_id));
            }
        }

        if let Some(mutation) = &diff.treasury {
            let current = ledger.treasury.as_ref().ok_or(LedgerError::MissingTreasury)?;
            if mutation.consumed != *current {
                return Err(LedgerError::TreasuryMismatch {
                    expected: current.milestone_id,
                    found: mutation.consumed.milestone_id,
                });
            }
        }

        self.backend
            .append(&JournalEntry::Confirmation(Box::new(diff.clone())))
            .await
            .map_err(|e| LedgerError::Backend(Box::new(e)))?;

        ledger.commit(diff);
        debug!(ledger_index = %ledger.ledger_index(), "confirmation applied to ledger");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{
        address::{Address, Ed25519Address},
        ledger::SpentMetadata,
        message::{transaction::TransactionId, MessageId},
        output::{BasicOutput, Output},
        tangle::{MilestoneIndexTimestamp, MilestoneTimestamp},
    };

    fn genesis_output(amount: u64, seed: u8) -> LedgerOutput {
        LedgerOutput::new(
            OutputId {
                transaction_id: TransactionId([seed; 32]),
                index: 0,
            },
            MessageId([seed; 32]),
            MilestoneIndexTimestamp {
                milestone_index: MilestoneIndex(0),
                milestone_timestamp: MilestoneTimestamp(0),
            },
            Output::Basic(BasicOutput::simple(amount, Address::Ed25519 {
                address: Ed25519Address([seed; 32]),
            })),
        )
    }

    fn spend(output: &LedgerOutput, by: TransactionId, at: MilestoneIndex) -> LedgerSpent {
        LedgerSpent {
            output: output.clone(),
            spent_metadata: SpentMetadata {
                transaction_id: by,
                spent: MilestoneIndexTimestamp {
                    milestone_index: at,
                    milestone_timestamp: MilestoneTimestamp(1000),
                },
            },
        }
    }

    fn diff(index: u32, created: Vec<LedgerOutput>, consumed: Vec<LedgerSpent>) -> MilestoneDiff {
        MilestoneDiff {
            index: MilestoneIndex(index),
            milestone_id: MilestoneId([index as u8; 32]),
            created_outputs: created,
            consumed_outputs: consumed,
            treasury: None,
            receipt: None,
        }
    }

    #[tokio::test]
    async fn test_apply_moves_consumed_to_spent() {
        let manager = UtxoManager::open(MemoryLedgerBackend::new()).await.unwrap();
        let genesis = genesis_output(1000, 1);
        manager.add_unspent_output(genesis.clone()).await.unwrap();

        let created = genesis_output(1000, 2);
        let mut ledger = manager.write().await;
        manager
            .apply_confirmation(
                &mut ledger,
                diff(1, vec![created.clone()], vec![spend(&genesis, TransactionId([2; 32]), MilestoneIndex(1))]),
            )
            .await
            .unwrap();

        assert_eq!(ledger.ledger_index(), MilestoneIndex(1));
        assert!(ledger.unspent_output(&genesis.output_id).is_none());
        assert!(ledger.is_output_spent(&genesis.output_id));
        assert!(ledger.unspent_output(&created.output_id).is_some());
        assert_eq!(ledger.unspent_amount(), 1000);
    }

    #[tokio::test]
    async fn test_ledger_index_gap_is_rejected() {
        let manager = UtxoManager::open(MemoryLedgerBackend::new()).await.unwrap();
        let mut ledger = manager.write().await;
        let result = manager.apply_confirmation(&mut ledger, diff(2, vec![], vec![])).await;
        assert!(matches!(
            result,
            Err(LedgerError::LedgerIndexGap { expected, actual })
                if expected == MilestoneIndex(1) && actual == MilestoneIndex(2)
        ));
        assert_eq!(ledger.ledger_index(), MilestoneIndex(0));
    }

    #[tokio::test]
    async fn test_double_spend_is_rejected() {
        let manager = UtxoManager::open(MemoryLedgerBackend::new()).await.unwrap();
        let genesis = genesis_output(1000, 1);
        manager.add_unspent_output(genesis.clone()).await.unwrap();

        let mut ledger = manager.write().await;
        let spent = spend(&genesis, TransactionId([2; 32]), MilestoneIndex(1));
        let result = manager
            .apply_confirmation(&mut ledger, diff(1, vec![], vec![spent.clone(), spent]))
            .await;
        assert!(matches!(result, Err(LedgerError::DoubleSpend(id)) if id == genesis.output_id));
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let manager = UtxoManager::open(MemoryLedgerBackend::new()).await.unwrap();
        let genesis = genesis_output(1000, 1);
        manager.add_unspent_output(genesis.clone()).await.unwrap();

        let mut ledger = manager.write().await;
        let result = manager
            .apply_confirmation(&mut ledger, diff(1, vec![genesis.clone()], vec![]))
            .await;
        assert!(matches!(result, Err(LedgerError::DuplicateCreate(id)) if id == genesis.output_id));
    }

    #[tokio::test]
    async fn test_treasury_mismatch_is_rejected() {
        let manager = UtxoManager::open(MemoryLedgerBackend::new()).await.unwrap();
        manager
            .bootstrap_treasury(TreasuryRecord {
                milestone_id: MilestoneId([7; 32]),
                amount: 10_000,
            })
            .await
            .unwrap();

        let mut ledger = manager.write().await;
        let mut bad = diff(1, vec![], vec![]);
        bad.treasury = Some(TreasuryMutation {
            created: TreasuryRecord {
                milestone_id: MilestoneId([1; 32]),
                amount: 9_000,
            },
            consumed: TreasuryRecord {
                milestone_id: MilestoneId([8; 32]),
                amount: 10_000,
            },
        });
        let result = manager.apply_confirmation(&mut ledger, bad).await;
        assert!(matches!(result, Err(LedgerError::TreasuryMismatch { .. })));
    }

    #[tokio::test]
    async fn test_journal_replay_recovers_state() {
        let backend = std::sync::Arc::new(MemoryLedgerBackend::new());
        let manager = UtxoManager::open(backend.clone()).await.unwrap();
        let genesis = genesis_output(1000, 1);
        manager.add_unspent_output(genesis.clone()).await.unwrap();
        {
            let created = genesis_output(600, 2);
            let mut ledger = manager.write().await;
            manager
                .apply_confirmation(
                    &mut ledger,
                    diff(
                        1,
                        vec![created],
                        vec![spend(&genesis, TransactionId([2; 32]), MilestoneIndex(1))],
                    ),
                )
                .await
                .unwrap();
        }

        let recovered = UtxoManager::open(backend).await.unwrap();
        let ledger = recovered.read().await;
        assert_eq!(ledger.ledger_index(), MilestoneIndex(1));
        assert_eq!(ledger.unspent_amount(), 600);
        assert!(ledger.is_output_spent(&genesis.output_id));
        assert!(ledger.milestone_diff(MilestoneIndex(1)).is_some());
    }
}
