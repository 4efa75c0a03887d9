// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::sync::Arc;

use crypto::signatures::ed25519::SecretKey;
use whiteflag_core::{
    config::ProtocolConfig,
    events::{ConfirmationEvents, NullEvents},
    store::{MemoryMessageStore, MessageStore},
    types::{
        address::{Address, Ed25519Address},
        ledger::LedgerOutput,
        message::{
            milestone::{MilestoneEssence, MilestoneId, MilestoneOption, MilestonePayload},
            tagged_data::TaggedDataPayload,
            transaction::{Input, Signature, TransactionEssence, TransactionId, TransactionPayload, Unlock},
            Message, MessageId, Parents, Payload,
        },
        output::{BasicOutput, Output, OutputId},
        tangle::{MilestoneIndex, MilestoneIndexTimestamp, MilestoneTimestamp},
    },
    utxo::{MemoryLedgerBackend, UtxoManager},
    ConfirmationEngine,
};

/// A deterministic Ed25519 keypair with its ledger address.
pub struct Wallet {
    secret: SecretKey,
}

impl Wallet {
    pub fn new(seed: u8) -> Self {
        Self {
            secret: SecretKey::from_bytes([seed; 32]),
        }
    }

    pub fn address(&self) -> Address {
        Address::Ed25519 {
            address: Ed25519Address::from_public_key(&self.secret.public_key().to_bytes()),
        }
    }

    pub fn sign(&self, essence: &TransactionEssence) -> Unlock {
        let signature = self.secret.sign(&essence.hash());
        Unlock::Signature {
            signature: Signature::Ed25519 {
                public_key: self.secret.public_key().to_bytes(),
                signature: signature.to_bytes(),
            },
        }
    }
}

/// Builds a signed transfer of `consumed` into `outputs`, all owned by `wallet`.
pub fn transfer(
    wallet: &Wallet,
    network_id: u64,
    consumed: &[LedgerOutput],
    outputs: Vec<Output>,
) -> TransactionPayload {
    let inputs = consumed
        .iter()
        .map(|output| Input::Utxo {
            output_id: output.output_id,
        })
        .collect::<Vec<_>>();
    let essence = TransactionEssence::Regular {
        network_id,
        inputs: inputs.into_boxed_slice(),
        inputs_commitment: TransactionEssence::inputs_commitment(consumed.iter().map(|o| &o.output)),
        outputs: outputs.into_boxed_slice(),
        payload: None,
    };
    let mut unlocks = vec![wallet.sign(&essence)];
    for _ in 1..consumed.len() {
        unlocks.push(Unlock::Reference { index: 0 });
    }
    TransactionPayload {
        essence,
        unlocks: unlocks.into_boxed_slice(),
    }
}

pub fn basic(amount: u64, address: Address) -> Output {
    Output::Basic(BasicOutput::simple(amount, address))
}

pub fn sorted(mut ids: Vec<MessageId>) -> Vec<MessageId> {
    ids.sort_unstable();
    ids
}

pub fn message(parents: Vec<MessageId>, payload: Option<Payload>) -> Message {
    Message {
        protocol_version: 2,
        parents: Parents::new(sorted(parents)).unwrap(),
        payload,
        nonce: 0,
    }
}

pub fn tagged_message(parents: Vec<MessageId>, tag: &[u8]) -> Message {
    message(
        parents,
        Some(Payload::TaggedData(TaggedDataPayload {
            tag: tag.to_vec(),
            data: b"hello tangle".to_vec(),
        })),
    )
}

pub fn transaction_message(parents: Vec<MessageId>, transaction: TransactionPayload) -> Message {
    message(parents, Some(Payload::Transaction(Box::new(transaction))))
}

/// Builds a milestone message whose payload carries the given roots and options.
pub fn milestone_message(
    index: u32,
    timestamp: u32,
    previous_milestone_id: MilestoneId,
    parents: Vec<MessageId>,
    confirmed_merkle_root: [u8; 32],
    applied_merkle_root: [u8; 32],
    options: Vec<MilestoneOption>,
) -> Message {
    let parents = sorted(parents);
    let payload = MilestonePayload {
        essence: MilestoneEssence {
            index: MilestoneIndex(index),
            timestamp: MilestoneTimestamp(timestamp),
            protocol_version: 2,
            previous_milestone_id,
            parents: Parents::new(parents.clone()).unwrap(),
            confirmed_merkle_root,
            applied_merkle_root,
            metadata: vec![],
            options: options.into_boxed_slice(),
        },
        signatures: Box::new([]),
    };
    message(parents, Some(Payload::Milestone(Box::new(payload))))
}

/// A fully wired confirmation core over in-memory collaborators.
pub struct TestNode {
    pub store: Arc<MemoryMessageStore>,
    pub backend: Arc<MemoryLedgerBackend>,
    pub utxo: Arc<UtxoManager<Arc<MemoryLedgerBackend>>>,
    pub engine: ConfirmationEngine<Arc<MemoryMessageStore>, Arc<MemoryLedgerBackend>>,
    pub config: ProtocolConfig,
}

impl TestNode {
    pub async fn new() -> Self {
        Self::with_events(Arc::new(NullEvents)).await
    }

    pub async fn with_events(events: Arc<dyn ConfirmationEvents>) -> Self {
        let config = ProtocolConfig::default();
        let store = Arc::new(MemoryMessageStore::new());
        let backend = Arc::new(MemoryLedgerBackend::new());
        let utxo = Arc::new(UtxoManager::open(backend.clone()).await.unwrap());
        let engine = ConfirmationEngine::new(store.clone(), utxo.clone(), config.clone(), events);
        Self {
            store,
            backend,
            utxo,
            engine,
            config,
        }
    }

    pub fn network_id(&self) -> u64 {
        self.config.network_id()
    }

    /// Inserts a message that acts as the already confirmed history below the cone under test.
    pub async fn referenced_tip(&self) -> MessageId {
        let handle = self.store.insert(tagged_message(vec![MessageId([0xee; 32])], b"history"));
        let message_id = *handle.message_id();
        self.store
            .metadata(&message_id)
            .await
            .unwrap()
            .unwrap()
            .update(|metadata| metadata.set_referenced(MilestoneIndex(0)));
        message_id
    }

    /// Books a genesis output of `amount` owned by `address`.
    pub async fn book_genesis(&self, seed: u8, amount: u64, address: Address) -> LedgerOutput {
        let output = LedgerOutput::new(
            OutputId {
                transaction_id: TransactionId([seed; 32]),
                index: 0,
            },
            MessageId([seed; 32]),
            MilestoneIndexTimestamp {
                milestone_index: MilestoneIndex(0),
                milestone_timestamp: MilestoneTimestamp(0),
            },
            basic(amount, address),
        );
        self.utxo.add_unspent_output(output.clone()).await.unwrap();
        output
    }
}

/// The sum that the conservation invariant fixes: unspent outputs plus the treasury.
pub async fn total_supply(utxo: &UtxoManager<Arc<MemoryLedgerBackend>>) -> u128 {
    let ledger = utxo.read().await;
    ledger.unspent_amount() + ledger.unspent_treasury().map_or(0, |treasury| treasury.amount as u128)
}
