// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module that contains the deterministic post-order traversal of the parent DAG.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{
    store::{MessageHandle, MessageStore},
    types::{ledger::MessageMetadata, message::MessageId},
};

/// Whether the traversal descends into a message's past cone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Descend {
    /// Visit the message and its ancestors.
    Traverse,
    /// Neither visit the message nor descend into its ancestors.
    Skip,
}

/// Errors raised while walking the parent DAG.
#[derive(Error, Debug)]
pub enum TraversalError<E: std::error::Error> {
    /// A referenced message is not present in the store.
    #[error("message {0} not found")]
    MissingMessage(MessageId),
    /// The metadata of a referenced message is not present in the store.
    #[error("metadata of message {0} not found")]
    MissingMetadata(MessageId),
    /// The parent references form a cycle, which ingestion must never produce.
    #[error("parent cycle detected at message {0}")]
    Cycle(MessageId),
    /// The underlying storage failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The condition or the visitor aborted the traversal.
    #[error(transparent)]
    Interrupted(E),
}

/// Walks the past cone of a set of entry points in deterministic post-order.
///
/// A message is presented to the visitor only once all of its parents have been visited,
/// skipped by the condition, or handled in an earlier part of this traversal. Among the
/// parents of a message, cones are explored in the order the parents are listed on the
/// message, which is ascending by construction.
pub struct ParentsTraverser<'a, S> {
    store: &'a S,
}

impl<'a, S: MessageStore> ParentsTraverser<'a, S> {
    /// Creates a traverser reading from `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Traverses the past cone of `entry_points`.
    ///
    /// `condition` decides per message whether its cone is entered; returning an error aborts
    /// the traversal. `visitor` is invoked exactly once per traversed message, in post-order.
    pub async fn traverse<E, C, V>(
        &self,
        entry_points: &[MessageId],
        mut condition: C,
        mut visitor: V,
    ) -> Result<(), TraversalError<E>>
    where
        E: std::error::Error,
        C: FnMut(&MessageMetadata) -> Result<Descend, E>,
        V: FnMut(&MessageHandle) -> Result<(), E>,
    {
        // Handled messages, whether visited or skipped; enforces the exactly-once contract.
        let mut handled = HashSet::new();
        // Memoized condition results for messages that are still being expanded.
        let mut checked = HashMap::new();
        // Message handles of expanded stack entries, so each message is read once.
        let mut expanded = HashMap::new();
        // The stack is an ancestor chain; re-encountering an element of it is a cycle.
        let mut on_stack = HashSet::new();
        let mut stack = Vec::new();

        for entry_point in entry_points {
            if handled.contains(entry_point) {
                continue;
            }
            stack.push(*entry_point);
            on_stack.insert(*entry_point);

            while let Some(&current) = stack.last() {
                if handled.contains(&current) {
                    stack.pop();
                    on_stack.remove(&current);
                    continue;
                }

                let descend = match checked.get(&current) {
                    Some(descend) => *descend,
                    None => {
                        let metadata = self
                            .store
                            .metadata(&current)
                            .await
                            .map_err(|e| TraversalError::Storage(Box::new(e)))?
                            .ok_or(TraversalError::MissingMetadata(current))?;
                        let descend = metadata
                            .with(|metadata| condition(metadata))
                            .map_err(TraversalError::Interrupted)?;
                        checked.insert(current, descend);
                        descend
                    }
                };

                if descend == Descend::Skip {
                    handled.insert(current);
                    checked.remove(&current);
                    stack.pop();
                    on_stack.remove(&current);
                    continue;
                }

                if !expanded.contains_key(&current) {
                    let handle = self
                        .store
                        .message(&current)
                        .await
                        .map_err(|e| TraversalError::Storage(Box::new(e)))?
                        .ok_or(TraversalError::MissingMessage(current))?;
                    expanded.insert(current, handle);
                }
                // Panic: inserted above if it was absent.
                let handle = expanded.get(&current).unwrap();

                let mut unhandled_parent = None;
                for parent in handle.parents.iter() {
                    if handled.contains(parent) {
                        continue;
                    }
                    if on_stack.contains(parent) {
                        return Err(TraversalError::Cycle(*parent));
                    }
                    unhandled_parent = Some(*parent);
                    break;
                }

                match unhandled_parent {
                    Some(parent) => {
                        stack.push(parent);
                        on_stack.insert(parent);
                    }
                    None => {
                        // Panic: the handle was inserted above.
                        let handle = expanded.remove(&current).unwrap();
                        visitor(&handle).map_err(TraversalError::Interrupted)?;
                        handled.insert(current);
                        checked.remove(&current);
                        stack.pop();
                        on_stack.remove(&current);
                    }
                }
            }
        }

        Ok(())
    }
}
