// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use super::{ConflictReason, LedgerInclusionState};
use crate::types::tangle::MilestoneIndex;

/// The cone root indexes of a message, tracking how far its past and future cones reach.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConeRootIndexes {
    /// The youngest cone root index.
    pub ycri: MilestoneIndex,
    /// The oldest cone root index.
    pub ocri: MilestoneIndex,
    /// The referencing index.
    pub ri: MilestoneIndex,
}

/// The mutable companion record of a message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Whether the past cone of the message is fully known.
    pub is_solid: bool,
    /// Whether a milestone has referenced the message. Transitions to `true` exactly once.
    pub is_referenced: bool,
    /// The index of the referencing milestone.
    pub referenced_by_milestone_index: Option<MilestoneIndex>,
    /// The cone root indexes, set when the message is referenced.
    pub cone_root_indexes: Option<ConeRootIndexes>,
    /// The conflict that excluded the message's transaction, if any.
    pub conflict: ConflictReason,
    /// Whether the message was referenced without carrying a transaction.
    pub is_no_transaction: bool,
}

impl MessageMetadata {
    /// Marks the message as referenced by the milestone at `index`.
    ///
    /// The transition is permanent; calling this on an already referenced message is a no-op.
    pub fn set_referenced(&mut self, index: MilestoneIndex) {
        if !self.is_referenced {
            self.is_referenced = true;
            self.referenced_by_milestone_index = Some(index);
            self.cone_root_indexes = Some(ConeRootIndexes {
                ycri: index,
                ocri: index,
                ri: index,
            });
        }
    }

    /// The inclusion state of the message, if it has been referenced.
    pub fn inclusion_state(&self) -> Option<LedgerInclusionState> {
        if !self.is_referenced {
            None
        } else if self.conflict.is_conflicting() {
            Some(LedgerInclusionState::Conflicting)
        } else if self.is_no_transaction {
            Some(LedgerInclusionState::NoTransaction)
        } else {
            Some(LedgerInclusionState::Included)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_referenced_transition_is_permanent() {
        let mut metadata = MessageMetadata::default();
        metadata.set_referenced(MilestoneIndex(7));
        metadata.set_referenced(MilestoneIndex(9));
        assert_eq!(metadata.referenced_by_milestone_index, Some(MilestoneIndex(7)));
        assert_eq!(
            metadata.cone_root_indexes,
            Some(ConeRootIndexes {
                ycri: MilestoneIndex(7),
                ocri: MilestoneIndex(7),
                ri: MilestoneIndex(7),
            })
        );
    }
}
