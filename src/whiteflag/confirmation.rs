// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{compute_white_flag_mutations, WhiteFlagMutations};
use crate::{
    config::ProtocolConfig,
    error::ConfirmationError,
    events::ConfirmationEvents,
    metrics::ServerMetrics,
    store::MessageStore,
    types::{
        ledger::ConflictReason,
        message::{MessageId, MilestoneId, MilestoneOption},
        tangle::{MilestoneIndex, MilestoneIndexTimestamp, MilestoneTimestamp},
    },
    utxo::{
        receipt_to_outputs, validate_receipt, LedgerBackend, LedgerError, MilestoneDiff, ReceiptError,
        ReceiptRecord, TreasuryMutation, TreasuryRecord, UtxoManager,
    },
};

/// The outcome of a confirmed milestone, as handed to event subscribers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// The index of the confirmed milestone.
    pub milestone_index: MilestoneIndex,
    /// The id of the message that carried the milestone.
    pub milestone_message_id: MessageId,
    /// The id of the milestone payload.
    pub milestone_id: MilestoneId,
    /// The classification and ledger mutations of the cone.
    pub mutations: WhiteFlagMutations,
}

/// Counts over one confirmed milestone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfirmedMilestoneStats {
    /// The number of messages referenced by the milestone.
    pub messages_referenced: usize,
    /// The number of referenced messages with an applied transaction.
    pub messages_included_with_transactions: usize,
    /// The number of referenced messages without a transaction.
    pub messages_excluded_without_transactions: usize,
    /// The number of referenced messages with a conflicting transaction.
    pub messages_excluded_with_conflicting_transactions: usize,
}

/// Wall-clock durations of the phases of one confirmation.
#[derive(Clone, Debug, Default)]
pub struct ConfirmationMetrics {
    /// Traversal and classification.
    pub duration_whiteflag: Duration,
    /// Receipt validation and conversion.
    pub duration_receipt: Duration,
    /// The atomic ledger apply.
    pub duration_apply_confirmation: Duration,
    /// The metadata pass over the included messages.
    pub duration_apply_included: Duration,
    /// The metadata pass over the messages without transactions.
    pub duration_apply_excluded_no_transaction: Duration,
    /// The metadata pass over the conflicting messages.
    pub duration_apply_excluded_conflicting: Duration,
    /// The whole confirmation.
    pub duration_total: Duration,
}

/// Everything `confirm` reports back on success.
#[derive(Clone, Debug)]
pub struct ConfirmedMilestone {
    /// The confirmation as emitted to subscribers.
    pub confirmation: Confirmation,
    /// Counts over the confirmed cone.
    pub stats: ConfirmedMilestoneStats,
    /// Per-phase durations.
    pub metrics: ConfirmationMetrics,
}

/// Confirms milestones: walks the cone, verifies the Merkle roots, applies the mutations
/// atomically and updates the per-message metadata.
///
/// The engine owns handles to its collaborators; nothing about it is process-global. It is
/// constructed at startup and dropped on shutdown, after the in-flight confirmation drained.
pub struct ConfirmationEngine<S, B> {
    store: S,
    utxo: Arc<UtxoManager<B>>,
    config: ProtocolConfig,
    events: Arc<dyn ConfirmationEvents>,
    metrics: Arc<ServerMetrics>,
}

impl<S: MessageStore, B: LedgerBackend> ConfirmationEngine<S, B> {
    /// Creates an engine over the given collaborators.
    pub fn new(
        store: S,
        utxo: Arc<UtxoManager<B>>,
        config: ProtocolConfig,
        events: Arc<dyn ConfirmationEvents>,
    ) -> Self {
        Self {
            store,
            utxo,
            config,
            events,
            metrics: Arc::new(ServerMetrics::default()),
        }
    }

    /// The node-wide confirmation counters.
    pub fn metrics(&self) -> &Arc<ServerMetrics> {
        &self.metrics
    }

    /// The UTXO manager the engine applies to.
    pub fn utxo(&self) -> &Arc<UtxoManager<B>> {
        &self.utxo
    }

    /// Confirms the milestone carried by `milestone_message_id`.
    ///
    /// Takes the ledger write lock for the full duration, so the classification runs against a
    /// frozen snapshot and the apply is atomic with the transition to confirmed. The operation
    /// is not cancelled once started; shutdown waits for it to finish.
    pub async fn confirm(&self, milestone_message_id: MessageId) -> Result<ConfirmedMilestone, ConfirmationError> {
        let milestone_message = self
            .store
            .message(&milestone_message_id)
            .await
            .map_err(|e| ConfirmationError::Storage(Box::new(e)))?
            .ok_or(ConfirmationError::MissingMilestoneMessage(milestone_message_id))?;
        let milestone = milestone_message
            .milestone()
            .ok_or(ConfirmationError::NotAMilestone(milestone_message_id))?;

        let milestone_id = milestone.id();
        let milestone_index = milestone.essence.index;
        if milestone_index == 0 {
            return Err(ConfirmationError::InvalidMilestoneIndex);
        }
        let milestone_timestamp = milestone.essence.timestamp;

        let time_start = Instant::now();
        let mut ledger = self.utxo.write().await;

        if milestone.essence.previous_milestone_id != ledger.previous_milestone_id() {
            return Err(ConfirmationError::InvalidPreviousMilestoneId {
                expected: ledger.previous_milestone_id(),
                found: milestone.essence.previous_milestone_id,
            });
        }

        debug!(index = %milestone_index, "computing white-flag mutations");
        let mut mutations = compute_white_flag_mutations(
            &self.store,
            &ledger,
            &self.config,
            milestone_index,
            milestone_timestamp,
            &milestone.essence.parents,
        )
        .await?;
        let time_whiteflag = Instant::now();

        if mutations.confirmed_merkle_root != milestone.essence.confirmed_merkle_root {
            return Err(ConfirmationError::ConfirmedMerkleRootMismatch {
                computed: prefix_hex::encode(mutations.confirmed_merkle_root),
                expected: prefix_hex::encode(milestone.essence.confirmed_merkle_root),
            });
        }
        if mutations.applied_merkle_root != milestone.essence.applied_merkle_root {
            return Err(ConfirmationError::AppliedMerkleRootMismatch {
                computed: prefix_hex::encode(mutations.applied_merkle_root),
                expected: prefix_hex::encode(milestone.essence.applied_merkle_root),
            });
        }

        let mut treasury_mutation = None;
        let mut receipt_record = None;
        if let Some(MilestoneOption::Receipt {
            migrated_at,
            last,
            funds,
            transaction,
        }) = milestone.receipt()
        {
            let record = ReceiptRecord {
                at: milestone_index,
                migrated_at: *migrated_at,
                last: *last,
                funds: funds.to_vec(),
                transaction: *transaction,
            };
            self.events.on_receipt(&record).map_err(ReceiptError::Rejected)?;

            let consumed = ledger
                .unspent_treasury()
                .ok_or(LedgerError::MissingTreasury)?
                .clone();
            validate_receipt(&record, &consumed)?;

            mutations.new_outputs.extend(receipt_to_outputs(
                &record,
                milestone_message_id,
                milestone_id,
                MilestoneIndexTimestamp {
                    milestone_index,
                    milestone_timestamp,
                },
            ));
            treasury_mutation = Some(TreasuryMutation {
                created: TreasuryRecord {
                    milestone_id,
                    amount: record.transaction.output_amount.0,
                },
                consumed,
            });
            receipt_record = Some(record);
        }
        let time_receipt = Instant::now();

        self.utxo
            .apply_confirmation(
                &mut ledger,
                MilestoneDiff {
                    index: milestone_index,
                    milestone_id,
                    created_outputs: mutations.new_outputs.clone(),
                    consumed_outputs: mutations.new_spents.clone(),
                    treasury: treasury_mutation.clone(),
                    receipt: receipt_record,
                },
            )
            .await?;
        let time_apply = Instant::now();

        let confirmation = Confirmation {
            milestone_index,
            milestone_message_id,
            milestone_id,
            mutations,
        };

        let mut stats = ConfirmedMilestoneStats::default();

        for message_id in &confirmation.mutations.included {
            if self
                .reference_message(message_id, None, false, milestone_index, milestone_timestamp, &mut stats)
                .await?
            {
                stats.messages_included_with_transactions += 1;
                self.metrics.included_transaction_messages.incr();
            }
        }
        let time_apply_included = Instant::now();

        for message_id in &confirmation.mutations.excluded_no_transaction {
            if self
                .reference_message(message_id, None, true, milestone_index, milestone_timestamp, &mut stats)
                .await?
            {
                stats.messages_excluded_without_transactions += 1;
                self.metrics.no_transaction_messages.incr();
            }
        }
        let time_apply_no_transaction = Instant::now();

        for (message_id, conflict) in &confirmation.mutations.excluded_conflicting {
            if self
                .reference_message(
                    message_id,
                    Some(*conflict),
                    false,
                    milestone_index,
                    milestone_timestamp,
                    &mut stats,
                )
                .await?
            {
                stats.messages_excluded_with_conflicting_transactions += 1;
                self.metrics.conflicting_transaction_messages.incr();
            }
        }
        let time_apply_conflicting = Instant::now();

        self.events.on_milestone_confirmed(&confirmation);
        self.events.on_ledger_updated(
            milestone_index,
            &confirmation.mutations.new_outputs,
            &confirmation.mutations.new_spents,
        );
        if let Some(mutation) = &treasury_mutation {
            self.events.on_treasury_mutated(milestone_index, mutation);
        }
        self.metrics.confirmed_milestones.incr();

        drop(ledger);

        info!(
            index = %milestone_index,
            referenced = stats.messages_referenced,
            included = stats.messages_included_with_transactions,
            conflicting = stats.messages_excluded_with_conflicting_transactions,
            "milestone confirmed"
        );

        Ok(ConfirmedMilestone {
            confirmation,
            stats,
            metrics: ConfirmationMetrics {
                duration_whiteflag: time_whiteflag - time_start,
                duration_receipt: time_receipt - time_whiteflag,
                duration_apply_confirmation: time_apply - time_receipt,
                duration_apply_included: time_apply_included - time_apply,
                duration_apply_excluded_no_transaction: time_apply_no_transaction - time_apply_included,
                duration_apply_excluded_conflicting: time_apply_conflicting - time_apply_no_transaction,
                duration_total: time_start.elapsed(),
            },
        })
    }

    /// Marks one message as referenced, returning whether this confirmation was the first to
    /// do so. Conflict and no-transaction flags are written regardless; the referenced
    /// transition itself is permanent and idempotent.
    async fn reference_message(
        &self,
        message_id: &MessageId,
        conflict: Option<ConflictReason>,
        no_transaction: bool,
        index: MilestoneIndex,
        timestamp: MilestoneTimestamp,
        stats: &mut ConfirmedMilestoneStats,
    ) -> Result<bool, ConfirmationError> {
        let metadata = self
            .store
            .metadata(message_id)
            .await
            .map_err(|e| ConfirmationError::Storage(Box::new(e)))?
            .ok_or(ConfirmationError::MissingReferencedMessage(*message_id))?;

        let newly_referenced = metadata.update(|metadata| {
            if let Some(conflict) = conflict {
                metadata.conflict = conflict;
            }
            if no_transaction {
                metadata.is_no_transaction = true;
            }
            if metadata.is_referenced {
                false
            } else {
                metadata.set_referenced(index);
                true
            }
        });

        if newly_referenced {
            stats.messages_referenced += 1;
            self.metrics.referenced_messages.incr();
            self.events.on_referenced_message(&metadata.snapshot(), index, timestamp);
        }

        Ok(newly_referenced)
    }
}
