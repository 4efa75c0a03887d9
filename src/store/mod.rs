// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the message store: content-addressed access to messages and their
//! mutable metadata.
//!
//! Handles are cheap reference-counted clones; releasing them is tied to scope, so every exit
//! path of a caller gives the slot back to the cache.

use std::{
    collections::HashMap,
    convert::Infallible,
    ops::Deref,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;

use crate::types::{
    ledger::MessageMetadata,
    message::{Message, MessageId},
};

/// A reference-counted handle to an immutable message.
#[derive(Clone, Debug)]
pub struct MessageHandle {
    message_id: MessageId,
    message: Arc<Message>,
}

impl MessageHandle {
    /// Creates a handle, computing the content-addressed id of the message.
    pub fn new(message: Message) -> Self {
        Self {
            message_id: message.id(),
            message: Arc::new(message),
        }
    }

    /// The id of the message.
    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }
}

impl Deref for MessageHandle {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.message
    }
}

/// A reference-counted handle to the mutable metadata of a message.
#[derive(Clone, Debug)]
pub struct MetadataHandle {
    message_id: MessageId,
    metadata: Arc<RwLock<MessageMetadata>>,
}

impl MetadataHandle {
    /// Creates a handle over fresh metadata.
    pub fn new(message_id: MessageId) -> Self {
        Self {
            message_id,
            metadata: Arc::new(RwLock::new(MessageMetadata::default())),
        }
    }

    /// The id of the message the metadata belongs to.
    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }

    /// Runs `f` over a shared borrow of the metadata.
    pub fn with<R>(&self, f: impl FnOnce(&MessageMetadata) -> R) -> R {
        // Panic: the lock is never held across a panic.
        f(&self.metadata.read().unwrap())
    }

    /// Runs `f` over an exclusive borrow of the metadata.
    pub fn update<R>(&self, f: impl FnOnce(&mut MessageMetadata) -> R) -> R {
        // Panic: the lock is never held across a panic.
        f(&mut self.metadata.write().unwrap())
    }

    /// Returns a copy of the current metadata.
    pub fn snapshot(&self) -> MessageMetadata {
        self.with(Clone::clone)
    }
}

/// Content-addressed, read-only access to messages and their metadata.
///
/// Ingestion writes are sequenced outside the confirmation core; a message's bytes are
/// published before its metadata becomes reachable.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// The error type of the underlying storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Retrieves a message by its id.
    async fn message(&self, message_id: &MessageId) -> Result<Option<MessageHandle>, Self::Error>;

    /// Retrieves the metadata of a message by its id.
    async fn metadata(&self, message_id: &MessageId) -> Result<Option<MetadataHandle>, Self::Error>;
}

#[async_trait]
impl<T: MessageStore> MessageStore for Arc<T> {
    type Error = T::Error;

    async fn message(&self, message_id: &MessageId) -> Result<Option<MessageHandle>, Self::Error> {
        (**self).message(message_id).await
    }

    async fn metadata(&self, message_id: &MessageId) -> Result<Option<MetadataHandle>, Self::Error> {
        (**self).metadata(message_id).await
    }
}

/// An in-memory message store.
///
/// Useful for tests and as the reference behavior of the trait.
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    messages: RwLock<HashMap<MessageId, MessageHandle>>,
    metadata: RwLock<HashMap<MessageId, MetadataHandle>>,
}

impl MemoryMessageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a message together with fresh metadata and returns its handle.
    pub fn insert(&self, message: Message) -> MessageHandle {
        let handle = MessageHandle::new(message);
        let message_id = *handle.message_id();
        // Panic: the locks are never held across a panic.
        self.messages.write().unwrap().insert(message_id, handle.clone());
        self.metadata
            .write()
            .unwrap()
            .entry(message_id)
            .or_insert_with(|| MetadataHandle::new(message_id));
        handle
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    type Error = Infallible;

    async fn message(&self, message_id: &MessageId) -> Result<Option<MessageHandle>, Self::Error> {
        // Panic: the lock is never held across a panic.
        Ok(self.messages.read().unwrap().get(message_id).cloned())
    }

    async fn metadata(&self, message_id: &MessageId) -> Result<Option<MetadataHandle>, Self::Error> {
        // Panic: the lock is never held across a panic.
        Ok(self.metadata.read().unwrap().get(message_id).cloned())
    }
}
