// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{merkle::MerkleHasher, semantic::validate_transaction};
use crate::{
    config::ProtocolConfig,
    store::MessageStore,
    traversal::{Descend, ParentsTraverser, TraversalError},
    types::{
        ledger::{ConflictReason, LedgerOutput, LedgerSpent, SpentMetadata},
        message::{transaction::Input, MessageId},
        output::OutputId,
        tangle::{MilestoneIndex, MilestoneIndexTimestamp, MilestoneTimestamp},
        util::bytify,
    },
    utxo::LedgerState,
};

/// Errors that abort a white-flag computation. A correct network never produces them; see the
/// error taxonomy of [`ConfirmationError`](crate::error::ConfirmationError).
#[derive(Error, Debug)]
pub enum WhiteFlagError {
    /// A message of the cone is not present in the store.
    #[error("message {0} not found")]
    MissingMessage(MessageId),
    /// The metadata of a message of the cone is not present in the store.
    #[error("metadata of message {0} not found")]
    MissingMetadata(MessageId),
    /// The parent references form a cycle.
    #[error("parent cycle detected at message {0}")]
    Cycle(MessageId),
    /// A message of the cone does not meet the proof-of-work floor; ingestion must never have
    /// admitted it.
    #[error("message {message_id} has pow score {score}, the minimum is {min}")]
    PowScoreTooLow {
        /// The offending message.
        message_id: MessageId,
        /// Its re-computed score.
        score: f64,
        /// The configured floor.
        min: u32,
    },
    /// The underlying storage failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<TraversalError<WhiteFlagError>> for WhiteFlagError {
    fn from(value: TraversalError<WhiteFlagError>) -> Self {
        match value {
            TraversalError::MissingMessage(id) => Self::MissingMessage(id),
            TraversalError::MissingMetadata(id) => Self::MissingMetadata(id),
            TraversalError::Cycle(id) => Self::Cycle(id),
            TraversalError::Storage(e) => Self::Storage(e),
            TraversalError::Interrupted(e) => e,
        }
    }
}

/// The outcome of classifying one milestone cone: the ordered classification lists, the staged
/// ledger mutations and the two Merkle roots over the classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhiteFlagMutations {
    /// The index of the classifying milestone.
    pub milestone_index: MilestoneIndex,
    /// The root over all referenced messages, in classification order.
    #[serde(with = "bytify")]
    pub confirmed_merkle_root: [u8; 32],
    /// The root over the included messages only, in classification order.
    #[serde(with = "bytify")]
    pub applied_merkle_root: [u8; 32],
    /// Messages whose transactions mutate the ledger, in visitation order.
    pub included: Vec<MessageId>,
    /// Messages without a transaction payload, in visitation order.
    pub excluded_no_transaction: Vec<MessageId>,
    /// Messages whose transactions conflict, with the first failing rule, in visitation order.
    pub excluded_conflicting: Vec<(MessageId, ConflictReason)>,
    /// The outputs created by the included transactions.
    pub new_outputs: Vec<LedgerOutput>,
    /// The outputs consumed by the included transactions.
    pub new_spents: Vec<LedgerSpent>,
}

impl WhiteFlagMutations {
    /// The number of messages referenced by the milestone.
    pub fn referenced_count(&self) -> usize {
        self.included.len() + self.excluded_no_transaction.len() + self.excluded_conflicting.len()
    }
}

/// Walks the cone of `parents` in deterministic post-order and classifies every not yet
/// referenced message against the frozen ledger snapshot.
///
/// A transaction's outputs become spendable by later transactions of the same cone only once
/// the transaction has been classified as included.
pub(crate) async fn compute_white_flag_mutations<S: MessageStore>(
    store: &S,
    ledger: &LedgerState,
    config: &ProtocolConfig,
    milestone_index: MilestoneIndex,
    milestone_timestamp: MilestoneTimestamp,
    parents: &[MessageId],
) -> Result<WhiteFlagMutations, WhiteFlagError> {
    let booked = MilestoneIndexTimestamp {
        milestone_index,
        milestone_timestamp,
    };

    let mut included = Vec::new();
    let mut excluded_no_transaction = Vec::new();
    let mut excluded_conflicting = Vec::new();
    let mut new_outputs: Vec<LedgerOutput> = Vec::new();
    let mut new_output_positions: HashMap<OutputId, usize> = HashMap::new();
    let mut new_spents: Vec<LedgerSpent> = Vec::new();
    let mut consumed_in_cone: HashSet<OutputId> = HashSet::new();

    ParentsTraverser::new(store)
        .traverse(
            parents,
            |metadata| {
                Ok(if metadata.is_referenced {
                    Descend::Skip
                } else {
                    Descend::Traverse
                })
            },
            |handle| {
                let message_id = *handle.message_id();

                if config.min_pow_score > 0 {
                    let score = handle.pow_score();
                    if score < config.min_pow_score as f64 {
                        return Err(WhiteFlagError::PowScoreTooLow {
                            message_id,
                            score,
                            min: config.min_pow_score,
                        });
                    }
                }

                let Some(transaction) = handle.transaction() else {
                    excluded_no_transaction.push(message_id);
                    return Ok(());
                };
                let transaction_id = transaction.id();

                let mut conflict = ConflictReason::None;
                let mut consumed = Vec::with_capacity(transaction.inputs().len());
                for input in transaction.inputs() {
                    match input {
                        Input::Utxo { output_id } => {
                            if consumed_in_cone.contains(output_id) {
                                conflict = ConflictReason::InputAlreadySpentInThisMilestone;
                            } else if ledger.is_output_spent(output_id) {
                                conflict = ConflictReason::InputAlreadySpent;
                            } else if let Some(position) = new_output_positions.get(output_id) {
                                consumed.push(new_outputs[*position].clone());
                                continue;
                            } else if let Some(output) = ledger.unspent_output(output_id) {
                                consumed.push(output.clone());
                                continue;
                            } else {
                                conflict = ConflictReason::InputNotFound;
                            }
                        }
                        // The treasury can only be consumed by a receipt, never by a transaction.
                        Input::Treasury { .. } => conflict = ConflictReason::SemanticValidationFailed,
                    }
                    break;
                }

                if !conflict.is_conflicting() {
                    conflict = validate_transaction(config, milestone_timestamp, transaction, &consumed);
                }

                if conflict.is_conflicting() {
                    excluded_conflicting.push((message_id, conflict));
                    return Ok(());
                }

                for output in consumed {
                    consumed_in_cone.insert(output.output_id);
                    new_spents.push(LedgerSpent {
                        output,
                        spent_metadata: SpentMetadata {
                            transaction_id,
                            spent: booked,
                        },
                    });
                }
                for (index, output) in transaction.outputs().iter().enumerate() {
                    let output_id = OutputId {
                        transaction_id,
                        index: index as u16,
                    };
                    new_output_positions.insert(output_id, new_outputs.len());
                    new_outputs.push(LedgerOutput::new(output_id, message_id, booked, output.clone()));
                }
                included.push(message_id);
                Ok(())
            },
        )
        .await?;

    let mut referenced = Vec::with_capacity(included.len() + excluded_no_transaction.len() + excluded_conflicting.len());
    referenced.extend_from_slice(&included);
    referenced.extend_from_slice(&excluded_no_transaction);
    referenced.extend(excluded_conflicting.iter().map(|(message_id, _)| *message_id));

    Ok(WhiteFlagMutations {
        milestone_index,
        confirmed_merkle_root: MerkleHasher::hash_message_ids(&referenced),
        applied_merkle_root: MerkleHasher::hash_message_ids(&included),
        included,
        excluded_no_transaction,
        excluded_conflicting,
        new_outputs,
        new_spents,
    })
}
