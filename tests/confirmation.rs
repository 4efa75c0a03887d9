// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

mod common;

use std::sync::{Arc, Mutex};

use common::*;
use whiteflag_core::{
    dto::OutputResponse,
    events::ConfirmationEvents,
    store::MessageStore,
    types::{
        ledger::{ConflictReason, LedgerInclusionState, LedgerOutput, LedgerSpent, MessageMetadata},
        message::{MessageId, MilestoneId},
        output::OutputId,
        tangle::{MilestoneIndex, MilestoneTimestamp},
    },
    utxo::{ReceiptRecord, TreasuryMutation, TreasuryRecord},
    whiteflag::{Confirmation, MerkleHasher},
    ConfirmationError,
};

#[tokio::test]
async fn test_empty_milestone_references_without_applying() {
    let node = TestNode::new().await;
    let wallet = Wallet::new(1);
    node.book_genesis(0xfa, 1000, wallet.address()).await;

    let tip = node.referenced_tip().await;
    let m1 = *node.store.insert(tagged_message(vec![tip], b"no-op")).message_id();

    let ms = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId::null(),
        vec![m1],
        MerkleHasher::hash_message_ids(&[m1]),
        MerkleHasher::hash_message_ids(&[]),
        vec![],
    ));
    let result = node.engine.confirm(*ms.message_id()).await.unwrap();

    assert!(result.confirmation.mutations.included.is_empty());
    assert_eq!(result.confirmation.mutations.excluded_no_transaction, vec![m1]);
    assert!(result.confirmation.mutations.excluded_conflicting.is_empty());
    // The root over no applied messages is the hash of the empty input.
    assert_eq!(
        prefix_hex::encode(result.confirmation.mutations.applied_merkle_root),
        "0x0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
    );
    assert_eq!(result.stats.messages_referenced, 1);
    assert_eq!(result.stats.messages_excluded_without_transactions, 1);

    let ledger = node.utxo.read().await;
    assert_eq!(ledger.ledger_index(), MilestoneIndex(1));
    assert_eq!(ledger.unspent_amount(), 1000);
}

#[tokio::test]
async fn test_single_transfer_is_applied() {
    let node = TestNode::new().await;
    let wallet_a = Wallet::new(1);
    let wallet_b = Wallet::new(2);
    let genesis = node.book_genesis(0xfa, 1000, wallet_a.address()).await;
    let supply_before = total_supply(&node.utxo).await;

    let tip = node.referenced_tip().await;

    // Milestone 1 confirms an empty cone so that milestone 2 has a predecessor.
    let m1 = *node.store.insert(tagged_message(vec![tip], b"one")).message_id();
    let ms1 = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId::null(),
        vec![m1],
        MerkleHasher::hash_message_ids(&[m1]),
        MerkleHasher::hash_message_ids(&[]),
        vec![],
    ));
    node.engine.confirm(*ms1.message_id()).await.unwrap();

    let transaction = transfer(
        &wallet_a,
        node.network_id(),
        std::slice::from_ref(&genesis),
        vec![basic(600, wallet_b.address()), basic(400, wallet_a.address())],
    );
    let transaction_id = transaction.id();
    let m_t = *node
        .store
        .insert(transaction_message(vec![m1], transaction))
        .message_id();

    let ms2 = node.store.insert(milestone_message(
        2,
        1100,
        ms1.milestone().unwrap().id(),
        vec![m_t],
        MerkleHasher::hash_message_ids(&[m_t]),
        MerkleHasher::hash_message_ids(&[m_t]),
        vec![],
    ));
    let result = node.engine.confirm(*ms2.message_id()).await.unwrap();

    assert_eq!(result.confirmation.mutations.included, vec![m_t]);
    assert_eq!(result.confirmation.mutations.new_spents.len(), 1);
    assert_eq!(result.confirmation.mutations.new_outputs.len(), 2);
    assert_eq!(
        result.confirmation.mutations.applied_merkle_root,
        MerkleHasher::hash_message_ids(&[m_t])
    );

    let ledger = node.utxo.read().await;
    assert_eq!(ledger.ledger_index(), MilestoneIndex(2));
    assert!(ledger.is_output_spent(&genesis.output_id));
    for index in 0..2u16 {
        assert!(ledger
            .unspent_output(&OutputId { transaction_id, index })
            .is_some());
    }
    drop(ledger);
    assert_eq!(total_supply(&node.utxo).await, supply_before);

    // The metadata of the transaction message records the inclusion.
    let metadata = node.store.metadata(&m_t).await.unwrap().unwrap().snapshot();
    assert!(metadata.is_referenced);
    assert_eq!(metadata.referenced_by_milestone_index, Some(MilestoneIndex(2)));
    assert_eq!(metadata.conflict, ConflictReason::None);
    assert_eq!(metadata.inclusion_state(), Some(LedgerInclusionState::Included));
}

#[tokio::test]
async fn test_double_spend_within_cone_first_wins() {
    let node = TestNode::new().await;
    let wallet_a = Wallet::new(1);
    let wallet_b = Wallet::new(2);
    let genesis = node.book_genesis(0xfa, 1000, wallet_a.address()).await;
    let tip = node.referenced_tip().await;

    let tx1 = transfer(
        &wallet_a,
        node.network_id(),
        std::slice::from_ref(&genesis),
        vec![basic(600, wallet_b.address()), basic(400, wallet_a.address())],
    );
    let tx2 = transfer(
        &wallet_a,
        node.network_id(),
        std::slice::from_ref(&genesis),
        vec![basic(1000, wallet_b.address())],
    );

    let m1 = node.store.insert(transaction_message(vec![tip], tx1.clone()));
    let m2 = node.store.insert(transaction_message(vec![tip], tx2.clone()));

    // The milestone parents are in ascending id order, which fixes the visitation order.
    let parents = sorted(vec![*m1.message_id(), *m2.message_id()]);
    let (winner, loser) = (parents[0], parents[1]);
    let winner_tx = if winner == *m1.message_id() { &tx1 } else { &tx2 };
    let loser_tx = if winner == *m1.message_id() { &tx2 } else { &tx1 };

    let ms = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId::null(),
        parents.clone(),
        MerkleHasher::hash_message_ids(&[winner, loser]),
        MerkleHasher::hash_message_ids(&[winner]),
        vec![],
    ));
    let result = node.engine.confirm(*ms.message_id()).await.unwrap();

    assert_eq!(result.confirmation.mutations.included, vec![winner]);
    assert_eq!(
        result.confirmation.mutations.excluded_conflicting,
        vec![(loser, ConflictReason::InputAlreadySpentInThisMilestone)]
    );

    // Only the winner's outputs were booked.
    let ledger = node.utxo.read().await;
    assert!(ledger
        .unspent_output(&OutputId {
            transaction_id: winner_tx.id(),
            index: 0
        })
        .is_some());
    assert!(ledger
        .unspent_output(&OutputId {
            transaction_id: loser_tx.id(),
            index: 0
        })
        .is_none());
    assert_eq!(ledger.unspent_amount(), 1000);

    // The loser's metadata records the conflict, and its inputs were not spent by it.
    let metadata = node.store.metadata(&loser).await.unwrap().unwrap().snapshot();
    assert!(metadata.is_referenced);
    assert_eq!(metadata.conflict, ConflictReason::InputAlreadySpentInThisMilestone);
    assert_eq!(metadata.inclusion_state(), Some(LedgerInclusionState::Conflicting));
    assert_eq!(
        ledger.spent_output(&genesis.output_id).unwrap().spent_metadata.transaction_id,
        winner_tx.id()
    );
}

#[tokio::test]
async fn test_classification_follows_traversal_order_not_identity() {
    // The same two conflicting transactions as the double-spend case, but chained: the
    // ancestor is always classified first, no matter how the ids compare.
    let node = TestNode::new().await;
    let wallet_a = Wallet::new(1);
    let wallet_b = Wallet::new(2);
    let genesis = node.book_genesis(0xfa, 1000, wallet_a.address()).await;
    let tip = node.referenced_tip().await;

    let tx1 = transfer(
        &wallet_a,
        node.network_id(),
        std::slice::from_ref(&genesis),
        vec![basic(600, wallet_b.address()), basic(400, wallet_a.address())],
    );
    let tx2 = transfer(
        &wallet_a,
        node.network_id(),
        std::slice::from_ref(&genesis),
        vec![basic(1000, wallet_b.address())],
    );

    let ancestor = node.store.insert(transaction_message(vec![tip], tx2.clone()));
    let descendant = node
        .store
        .insert(transaction_message(vec![*ancestor.message_id()], tx1.clone()));

    let ms = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId::null(),
        vec![*descendant.message_id()],
        MerkleHasher::hash_message_ids(&[*ancestor.message_id(), *descendant.message_id()]),
        MerkleHasher::hash_message_ids(&[*ancestor.message_id()]),
        vec![],
    ));
    let result = node.engine.confirm(*ms.message_id()).await.unwrap();

    assert_eq!(result.confirmation.mutations.included, vec![*ancestor.message_id()]);
    assert_eq!(
        result.confirmation.mutations.excluded_conflicting,
        vec![(*descendant.message_id(), ConflictReason::InputAlreadySpentInThisMilestone)]
    );

    let ledger = node.utxo.read().await;
    assert!(ledger
        .unspent_output(&OutputId {
            transaction_id: tx2.id(),
            index: 0
        })
        .is_some());
}

#[tokio::test]
async fn test_receipt_migrates_funds_into_the_ledger() {
    let node = TestNode::new().await;
    let wallet = Wallet::new(1);
    node.book_genesis(0xfa, 1000, wallet.address()).await;
    node.utxo
        .bootstrap_treasury(TreasuryRecord {
            milestone_id: MilestoneId([7; 32]),
            amount: 10_000,
        })
        .await
        .unwrap();
    let supply_before = total_supply(&node.utxo).await;

    let tip = node.referenced_tip().await;
    let m1 = *node.store.insert(tagged_message(vec![tip], b"receipt")).message_id();

    let receipt = receipt_option(
        vec![(0x21, 1_000, Wallet::new(3).address()), (0x22, 2_000, Wallet::new(4).address())],
        7_000,
        MilestoneId([7; 32]),
    );
    let ms = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId::null(),
        vec![m1],
        MerkleHasher::hash_message_ids(&[m1]),
        MerkleHasher::hash_message_ids(&[]),
        vec![receipt],
    ));
    let milestone_id = ms.milestone().unwrap().id();
    let result = node.engine.confirm(*ms.message_id()).await.unwrap();

    // Two migrated outputs were created on top of the empty cone.
    assert_eq!(result.confirmation.mutations.new_outputs.len(), 2);

    let ledger = node.utxo.read().await;
    let treasury = ledger.unspent_treasury().unwrap();
    assert_eq!(treasury.amount, 7_000);
    assert_eq!(treasury.milestone_id, milestone_id);
    let response = whiteflag_core::dto::TreasuryResponse::from(treasury);
    let json = serde_json::to_string(&response).unwrap();
    assert_eq!(
        serde_json::from_str::<whiteflag_core::dto::TreasuryResponse>(&json).unwrap(),
        response
    );
    assert_eq!(ledger.unspent_amount(), 1000 + 3_000);
    drop(ledger);
    assert_eq!(total_supply(&node.utxo).await, supply_before);
}

#[tokio::test]
async fn test_flipped_merkle_root_fails_without_state_change() {
    let node = TestNode::new().await;
    let wallet = Wallet::new(1);
    node.book_genesis(0xfa, 1000, wallet.address()).await;
    let tip = node.referenced_tip().await;
    let m1 = *node.store.insert(tagged_message(vec![tip], b"flip")).message_id();

    let mut applied_root = MerkleHasher::hash_message_ids(&[]);
    applied_root[0] ^= 0x01;
    let ms = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId::null(),
        vec![m1],
        MerkleHasher::hash_message_ids(&[m1]),
        applied_root,
        vec![],
    ));
    let result = node.engine.confirm(*ms.message_id()).await;

    assert!(matches!(
        result,
        Err(ConfirmationError::AppliedMerkleRootMismatch { .. })
    ));

    let ledger = node.utxo.read().await;
    assert_eq!(ledger.ledger_index(), MilestoneIndex(0));
    assert_eq!(ledger.unspent_amount(), 1000);
    drop(ledger);
    // The cone message was not referenced either.
    let metadata = node.store.metadata(&m1).await.unwrap().unwrap().snapshot();
    assert!(!metadata.is_referenced);
}

#[tokio::test]
async fn test_confirmation_is_deterministic() {
    // Two nodes built from the same fixtures classify the cone byte-identically.
    let mut roots = Vec::new();
    for _ in 0..2 {
        let node = TestNode::new().await;
        let wallet_a = Wallet::new(1);
        let wallet_b = Wallet::new(2);
        let genesis = node.book_genesis(0xfa, 1000, wallet_a.address()).await;
        let tip = node.referenced_tip().await;

        let tx1 = transfer(
            &wallet_a,
            node.network_id(),
            std::slice::from_ref(&genesis),
            vec![basic(600, wallet_b.address()), basic(400, wallet_a.address())],
        );
        let tx2 = transfer(
            &wallet_a,
            node.network_id(),
            std::slice::from_ref(&genesis),
            vec![basic(1000, wallet_b.address())],
        );
        let m1 = node.store.insert(transaction_message(vec![tip], tx1));
        let m2 = node.store.insert(transaction_message(vec![tip], tx2));
        let parents = sorted(vec![*m1.message_id(), *m2.message_id()]);

        let ms = node.store.insert(milestone_message(
            1,
            1000,
            MilestoneId::null(),
            parents.clone(),
            MerkleHasher::hash_message_ids(&[parents[0], parents[1]]),
            MerkleHasher::hash_message_ids(&[parents[0]]),
            vec![],
        ));
        let result = node.engine.confirm(*ms.message_id()).await.unwrap();
        roots.push((
            result.confirmation.mutations.confirmed_merkle_root,
            result.confirmation.mutations.applied_merkle_root,
            result.confirmation.mutations.included.clone(),
            result.confirmation.mutations.excluded_conflicting.clone(),
        ));
    }
    assert_eq!(roots[0], roots[1]);
}

#[tokio::test]
async fn test_conflict_reports_first_failing_rule() {
    let node = TestNode::new().await;
    let wallet_a = Wallet::new(1);
    let wallet_b = Wallet::new(2);
    let genesis = node.book_genesis(0xfa, 1000, wallet_a.address()).await;
    let tip = node.referenced_tip().await;

    // Input resolution fails before any semantic rule: the amounts are also unbalanced, but
    // the recorded conflict is the missing input.
    let mut phantom = genesis.clone();
    phantom.output_id = OutputId {
        transaction_id: whiteflag_core::types::message::transaction::TransactionId([0xcc; 32]),
        index: 7,
    };
    let not_found = transfer(
        &wallet_a,
        node.network_id(),
        std::slice::from_ref(&phantom),
        vec![basic(1, wallet_b.address())],
    );

    // An unlock by a key that does not own the consumed output fails before the unbalanced
    // amounts are considered.
    let bad_signature = transfer(
        &wallet_b,
        node.network_id(),
        std::slice::from_ref(&genesis),
        vec![basic(999, wallet_b.address())],
    );

    let m_not_found = node.store.insert(transaction_message(vec![tip], not_found));
    let m_bad_signature = node.store.insert(transaction_message(vec![tip], bad_signature));
    let parents = sorted(vec![*m_not_found.message_id(), *m_bad_signature.message_id()]);

    let ms = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId::null(),
        parents.clone(),
        MerkleHasher::hash_message_ids(&[parents[0], parents[1]]),
        MerkleHasher::hash_message_ids(&[]),
        vec![],
    ));
    let result = node.engine.confirm(*ms.message_id()).await.unwrap();

    let conflicts: std::collections::HashMap<_, _> =
        result.confirmation.mutations.excluded_conflicting.iter().cloned().collect();
    assert_eq!(conflicts[m_not_found.message_id()], ConflictReason::InputNotFound);
    assert_eq!(conflicts[m_bad_signature.message_id()], ConflictReason::InvalidUnlock);
    let ledger = node.utxo.read().await;
    assert_eq!(ledger.unspent_amount(), 1000);
}

#[tokio::test]
async fn test_milestone_chaining_is_enforced() {
    let node = TestNode::new().await;
    let tip = node.referenced_tip().await;
    let m1 = *node.store.insert(tagged_message(vec![tip], b"chain")).message_id();

    let ms = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId([9; 32]),
        vec![m1],
        MerkleHasher::hash_message_ids(&[m1]),
        MerkleHasher::hash_message_ids(&[]),
        vec![],
    ));
    assert!(matches!(
        node.engine.confirm(*ms.message_id()).await,
        Err(ConfirmationError::InvalidPreviousMilestoneId { .. })
    ));
}

#[tokio::test]
async fn test_confirming_a_non_milestone_fails() {
    let node = TestNode::new().await;
    let tip = node.referenced_tip().await;
    let m1 = node.store.insert(tagged_message(vec![tip], b"plain"));
    assert!(matches!(
        node.engine.confirm(*m1.message_id()).await,
        Err(ConfirmationError::NotAMilestone(id)) if id == *m1.message_id()
    ));
    assert!(matches!(
        node.engine.confirm(MessageId([0xab; 32])).await,
        Err(ConfirmationError::MissingMilestoneMessage(_))
    ));
}

#[derive(Default)]
struct RecordingEvents {
    calls: Mutex<Vec<&'static str>>,
}

impl ConfirmationEvents for RecordingEvents {
    fn on_receipt(&self, _: &ReceiptRecord) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.calls.lock().unwrap().push("receipt");
        Ok(())
    }

    fn on_referenced_message(&self, _: &MessageMetadata, _: MilestoneIndex, _: MilestoneTimestamp) {
        self.calls.lock().unwrap().push("referenced_message");
    }

    fn on_milestone_confirmed(&self, _: &Confirmation) {
        self.calls.lock().unwrap().push("milestone_confirmed");
    }

    fn on_ledger_updated(&self, _: MilestoneIndex, _: &[LedgerOutput], _: &[LedgerSpent]) {
        self.calls.lock().unwrap().push("ledger_updated");
    }

    fn on_treasury_mutated(&self, _: MilestoneIndex, _: &TreasuryMutation) {
        self.calls.lock().unwrap().push("treasury_mutated");
    }
}

#[tokio::test]
async fn test_event_order_is_fixed() {
    let events = Arc::new(RecordingEvents::default());
    let node = TestNode::with_events(events.clone()).await;
    node.utxo
        .bootstrap_treasury(TreasuryRecord {
            milestone_id: MilestoneId([7; 32]),
            amount: 10_000,
        })
        .await
        .unwrap();

    let tip = node.referenced_tip().await;
    let m1 = *node.store.insert(tagged_message(vec![tip], b"events")).message_id();
    let receipt = receipt_option(vec![(0x31, 3_000, Wallet::new(5).address())], 7_000, MilestoneId([7; 32]));
    let ms = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId::null(),
        vec![m1],
        MerkleHasher::hash_message_ids(&[m1]),
        MerkleHasher::hash_message_ids(&[]),
        vec![receipt],
    ));
    node.engine.confirm(*ms.message_id()).await.unwrap();

    assert_eq!(
        *events.calls.lock().unwrap(),
        vec![
            "receipt",
            "referenced_message",
            "milestone_confirmed",
            "ledger_updated",
            "treasury_mutated",
        ]
    );
}

#[tokio::test]
async fn test_ledger_recovers_from_journal_after_confirmation() {
    let node = TestNode::new().await;
    let wallet_a = Wallet::new(1);
    let wallet_b = Wallet::new(2);
    let genesis = node.book_genesis(0xfa, 1000, wallet_a.address()).await;
    let tip = node.referenced_tip().await;

    let transaction = transfer(
        &wallet_a,
        node.network_id(),
        std::slice::from_ref(&genesis),
        vec![basic(1000, wallet_b.address())],
    );
    let m_t = *node
        .store
        .insert(transaction_message(vec![tip], transaction))
        .message_id();
    let ms = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId::null(),
        vec![m_t],
        MerkleHasher::hash_message_ids(&[m_t]),
        MerkleHasher::hash_message_ids(&[m_t]),
        vec![],
    ));
    node.engine.confirm(*ms.message_id()).await.unwrap();

    let recovered = whiteflag_core::utxo::UtxoManager::open(node.backend.clone()).await.unwrap();
    let expected = node.engine.utxo().read().await;
    let ledger = recovered.read().await;
    assert_eq!(ledger.ledger_index(), expected.ledger_index());
    assert_eq!(ledger.previous_milestone_id(), expected.previous_milestone_id());
    assert_eq!(ledger.unspent_amount(), expected.unspent_amount());
    assert_eq!(ledger.is_output_spent(&genesis.output_id), true);
}

#[tokio::test]
async fn test_confirmation_and_output_response_round_trip() {
    let node = TestNode::new().await;
    let wallet_a = Wallet::new(1);
    let wallet_b = Wallet::new(2);
    let genesis = node.book_genesis(0xfa, 1000, wallet_a.address()).await;
    let tip = node.referenced_tip().await;

    let transaction = transfer(
        &wallet_a,
        node.network_id(),
        std::slice::from_ref(&genesis),
        vec![basic(1000, wallet_b.address())],
    );
    let m_t = *node
        .store
        .insert(transaction_message(vec![tip], transaction))
        .message_id();
    let ms = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId::null(),
        vec![m_t],
        MerkleHasher::hash_message_ids(&[m_t]),
        MerkleHasher::hash_message_ids(&[m_t]),
        vec![],
    ));
    let result = node.engine.confirm(*ms.message_id()).await.unwrap();

    let json = serde_json::to_string(&result.confirmation).unwrap();
    let parsed: Confirmation = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, result.confirmation);

    let ledger = node.utxo.read().await;
    let output = ledger.unspent_outputs().next().unwrap();
    let response = OutputResponse::unspent(output, ledger.ledger_index());
    let json = serde_json::to_string(&response).unwrap();
    let parsed: OutputResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, response);
}

/// Invariant: every visited message lands in exactly one classification bucket, and messages
/// referenced before the confirmation are not in any of them.
#[tokio::test]
async fn test_referenced_partition_is_disjoint_from_history() {
    let node = TestNode::new().await;
    let wallet_a = Wallet::new(1);
    let wallet_b = Wallet::new(2);
    let genesis = node.book_genesis(0xfa, 1000, wallet_a.address()).await;
    let tip = node.referenced_tip().await;

    let transaction = transfer(
        &wallet_a,
        node.network_id(),
        std::slice::from_ref(&genesis),
        vec![basic(1000, wallet_b.address())],
    );
    let m_t = *node
        .store
        .insert(transaction_message(vec![tip], transaction))
        .message_id();
    let m_tag = *node.store.insert(tagged_message(vec![m_t], b"tag")).message_id();

    let parents = sorted(vec![m_t, m_tag]);
    // Post-order puts the transaction ancestor first, whichever way the ids compare.
    let confirmed = vec![m_t, m_tag];
    let ms = node.store.insert(milestone_message(
        1,
        1000,
        MilestoneId::null(),
        parents,
        MerkleHasher::hash_message_ids(&confirmed),
        MerkleHasher::hash_message_ids(&[m_t]),
        vec![],
    ));
    let result = node.engine.confirm(*ms.message_id()).await.unwrap();

    let mutations = &result.confirmation.mutations;
    let mut all = mutations.included.clone();
    all.extend(&mutations.excluded_no_transaction);
    all.extend(mutations.excluded_conflicting.iter().map(|(id, _)| *id));
    assert_eq!(all.len(), 2);
    assert!(!all.contains(&tip));
    assert_eq!(mutations.referenced_count(), 2);
    assert_eq!(result.stats.messages_referenced, 2);
    assert_eq!(node.engine.metrics().referenced_messages.value(), 2);
    assert_eq!(node.engine.metrics().confirmed_milestones.value(), 1);
}

fn receipt_option(
    funds: Vec<(u8, u64, whiteflag_core::types::address::Address)>,
    new_treasury: u64,
    input_milestone_id: MilestoneId,
) -> whiteflag_core::types::message::MilestoneOption {
    use whiteflag_core::types::{
        message::milestone::{MigratedFundsEntry, TreasuryTransactionPayload},
        message::MilestoneOption,
    };
    MilestoneOption::Receipt {
        migrated_at: MilestoneIndex(100),
        last: false,
        funds: funds
            .into_iter()
            .map(|(seed, amount, address)| MigratedFundsEntry {
                tail_transaction_hash: [seed; MigratedFundsEntry::TAIL_TRANSACTION_HASH_LENGTH],
                address,
                amount,
            })
            .collect(),
        transaction: TreasuryTransactionPayload {
            input_milestone_id,
            output_amount: new_treasury.into(),
        },
    }
}
